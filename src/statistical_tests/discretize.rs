//! statistical_tests::discretize — rank-based quantizer for real-valued series.
//!
//! Purpose
//! -------
//! Map a real-valued series onto a finite integer alphabet {0, …, k−1} using
//! rank quantiles, so that the symbol sequence can be serialized one byte
//! per symbol and handed to a lossless compressor.
//!
//! Key behaviors
//! -------------
//! - Rank every observation with the *max* tie rule: all members of a tie
//!   group receive the highest rank in that group, ranks lying in [1, n].
//! - Bin each rank as ⌊rank · k / (n + 1)⌋, which always lies in [0, k−1].
//! - Serialize symbols with [`to_bytes`], one byte per symbol.
//! - Emit a `tracing` warning (not an error) when k exceeds the byte
//!   capacity (256) and a second one above 2¹⁶.
//!
//! Invariants & assumptions
//! ------------------------
//! - The discretizer is deterministic and never consumes randomness.
//! - Output symbols are a non-decreasing function of rank; equal inputs map
//!   to equal symbols.
//! - For k > 256, [`to_bytes`] aliases symbols modulo 256. This precision
//!   loss is accepted and reported, never silently corrected.
//!
//! Conventions
//! -----------
//! - Ranking is implemented once in [`max_ranks`] on `&[f64]`; callers
//!   holding other containers pass a slice.
//! - Ordering uses `f64::total_cmp`, so the ranking is total even though
//!   public entry points reject non-finite data up front.
//!
//! Downstream usage
//! ----------------
//! - The dependogram engine discretizes the raw series once and then
//!   block-shuffles the symbol sequence; shuffling permutes symbols without
//!   changing them, so re-discretizing each surrogate is unnecessary.
//!
//! Testing notes
//! -------------
//! - Unit tests pin the 1..=12, k = 4 mapping, tie handling, the single
//!   observation case, byte aliasing, and the overflow warnings (captured
//!   with a counting `tracing-subscriber` layer); property tests check range,
//!   monotonicity, and tie consistency on random input.

use crate::statistical_tests::errors::DependenceResult;
use crate::statistical_tests::validation::{validate_resolution, validate_sequence};

/// Number of distinct symbols representable by the one-byte encoding.
pub const BYTE_CAPACITY: usize = 256;

/// Secondary sanity threshold above which the resolution is almost
/// certainly a caller mistake.
pub const WIDE_SYMBOL_CAPACITY: usize = 1 << 16;

/// Discretize a real-valued series into `k` rank-quantile bins.
///
/// Parameters
/// ----------
/// - `data`: `&[f64]`
///   Series of length n ≥ 1; every value must be finite.
/// - `k`: `usize`
///   Number of bins (alphabet size); must satisfy k ≥ 1.
///
/// Returns
/// -------
/// `DependenceResult<Vec<usize>>`
///   Symbols `s[i] = ⌊rank(data[i]) · k / (n + 1)⌋ ∈ [0, k−1]`.
///
/// Errors
/// ------
/// - `DependenceError::EmptySequence` / `NonFiniteValue` from
///   `validate_sequence`.
/// - `DependenceError::InvalidResolution(0)` when `k == 0`.
///
/// Notes
/// -----
/// - k > 256 logs a warning because [`to_bytes`] will alias symbols; the
///   result is still returned.
///
/// Examples
/// --------
/// ```rust
/// use rust_dependogram::statistical_tests::discretize::discretize;
///
/// let data = [3.0, 1.0, 2.0, 2.0];
/// let symbols = discretize(&data, 2).unwrap();
/// assert_eq!(symbols, vec![1, 0, 1, 1]);
/// ```
pub fn discretize(data: &[f64], k: usize) -> DependenceResult<Vec<usize>> {
    validate_sequence(data)?;
    validate_resolution(k)?;
    warn_on_overflow(k);

    let n = data.len() as u128;
    let symbols = max_ranks(data)
        .into_iter()
        .map(|rank| ((rank as u128 * k as u128) / (n + 1)) as usize)
        .collect();
    Ok(symbols)
}

/// Rank a series with the max tie rule (ranks in 1..=n).
///
/// Every member of a group of equal values receives the largest rank the
/// group occupies, e.g. `[10, 20, 20, 30]` ranks as `[1, 3, 3, 4]`.
pub fn max_ranks(data: &[f64]) -> Vec<usize> {
    let n = data.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| data[a].total_cmp(&data[b]));

    let mut ranks = vec![0; n];
    let mut start = 0;
    while start < n {
        let value = data[order[start]];
        let mut end = start + 1;
        while end < n && data[order[end]] == value {
            end += 1;
        }
        // Positions start..end share the 1-based rank `end`.
        for &idx in &order[start..end] {
            ranks[idx] = end;
        }
        start = end;
    }
    ranks
}

/// Serialize symbols one byte each (symbols ≥ 256 alias modulo 256).
pub fn to_bytes(symbols: &[usize]) -> Vec<u8> {
    symbols.iter().map(|&s| s as u8).collect()
}

/// Report resolutions that the one-byte encoding cannot hold losslessly.
fn warn_on_overflow(k: usize) {
    if k > BYTE_CAPACITY {
        tracing::warn!(
            target: "rust_dependogram::discretize",
            k,
            capacity = BYTE_CAPACITY,
            "resolution exceeds byte capacity; symbols will alias in the byte encoding"
        );
    }
    if k > WIDE_SYMBOL_CAPACITY {
        tracing::warn!(
            target: "rust_dependogram::discretize",
            k,
            capacity = WIDE_SYMBOL_CAPACITY,
            "resolution exceeds 2^16 symbols; check the requested number of bins"
        );
    }
}
