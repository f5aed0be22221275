//! statistical_tests — compression-based serial dependence testing.
//!
//! Purpose
//! -------
//! Collect the pieces of the block-shuffle dependence test: a rank-based
//! discretizer, a compression entropy-rate estimator, a block-shuffle
//! surrogate generator, and the Monte Carlo engine that combines them into
//! a dependogram (one p-value per block size). Shared input validation and
//! the error type live alongside them, including the Python error bridge.
//!
//! Key behaviors
//! -------------
//! - [`discretize`](discretize::discretize) maps a real series to symbols
//!   in {0, …, k−1} by rank quantiles.
//! - [`entropy_rate`](entropy_rate::entropy_rate) estimates bits per input
//!   bit as compressed length / original length under a selectable
//!   [`CompressionMethod`].
//! - [`block_shuffle`](block_shuffle::block_shuffle) builds surrogates that
//!   keep dependence inside windows of length b and destroy it across them.
//! - [`dependogram`](dependogram::dependogram) runs the Monte Carlo test and
//!   returns a [`DependogramOutcome`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are non-empty and finite; every entry point calls the guards in
//!   [`validation`] before doing any work.
//! - Failures are reported via [`DependenceResult`]; panics indicate
//!   programming errors only.
//! - At the Python boundary every [`DependenceError`] becomes a
//!   `ValueError` carrying the `Display` message.
//!
//! Conventions
//! -----------
//! - All randomness flows through caller-supplied generators or a recorded
//!   master seed; nothing in this subtree reads global RNG state except when
//!   the caller explicitly omits a seed.
//!
//! Downstream usage
//! ----------------
//! - Typical Rust code imports the main surface as:
//!
//!   ```rust
//!   use rust_dependogram::statistical_tests::prelude::*;
//!
//!   let data: Vec<f64> = (0..300).map(|i| (i as f64).sin()).collect();
//!   let opts = DependogramOptions::default().with_nshuffles(10).with_seed(1);
//!   let outcome = dependogram(&data, &opts).unwrap();
//!   assert!(!outcome.p_values().is_empty());
//!   ```
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests next to the code; the end-to-end
//!   pipeline and i.i.d. calibration are exercised under `tests/`.

pub mod block_shuffle;
pub mod dependogram;
pub mod discretize;
pub mod entropy_rate;
pub mod errors;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::block_shuffle::{block_shuffle, block_shuffle_into, trial_seed};
pub use self::dependogram::{
    DependogramOptions, DependogramOutcome, NullDistribution, default_blocksizes, dependogram,
};
pub use self::discretize::{discretize, to_bytes};
pub use self::entropy_rate::{
    CompressionMethod, Compressor, entropy_rate, entropy_rate_profile, entropy_rate_with,
};
pub use self::errors::{DependenceError, DependenceResult};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::dependogram::{
        DependogramOptions, DependogramOutcome, NullDistribution, dependogram,
    };
    pub use super::entropy_rate::CompressionMethod;
    pub use super::errors::{DependenceError, DependenceResult};
}
