//! statistical_tests::validation — shared input guards for the dependence test.
//!
//! Purpose
//! -------
//! Centralize basic input validation for the discretizer, block shuffler,
//! and dependogram engine. This avoids duplicating checks on series length,
//! finiteness, resolution, block sizes, and shuffle counts across modules.
//!
//! Key behaviors
//! -------------
//! - Enforce simple preconditions before any ranking, compression, or
//!   Monte Carlo work is performed.
//! - Map invalid inputs into structured [`DependenceError`] values.
//!
//! Invariants & assumptions
//! ------------------------
//! - Input series must be non-empty and contain only finite values.
//! - The resolution `k` must be at least 1.
//! - Block sizes must satisfy `1 ≤ b ≤ n`; larger block sizes would yield
//!   zero windows, and the guards fail fast instead of silently returning an
//!   empty surrogate.
//! - The number of shuffles must be at least 1.
//! - A series fed to the dependogram engine must hold at least as many
//!   observations as bins (`n ≥ k`); shorter series cannot populate the
//!   alphabet and are rejected.
//!
//! Conventions
//! -----------
//! - This module performs no I/O and no allocation beyond error payloads.
//!
//! Downstream usage
//! ----------------
//! - Call these guards at the top of public entry points and treat `Ok(())`
//!   as a guarantee that the documented shape constraints hold.
//!
//! Testing notes
//! -------------
//! - Unit tests cover every error branch and a success path per guard.

use crate::statistical_tests::errors::{DependenceError, DependenceResult};

/// Validate that a series is non-empty and finite.
///
/// Errors
/// ------
/// - `DependenceError::EmptySequence` when `data.is_empty()`.
/// - `DependenceError::NonFiniteValue { index, value }` for the first
///   NaN or ±∞ entry.
pub fn validate_sequence(data: &[f64]) -> DependenceResult<()> {
    if data.is_empty() {
        return Err(DependenceError::EmptySequence);
    }

    if let Some((index, &value)) = data.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(DependenceError::NonFiniteValue { index, value });
    }

    Ok(())
}

/// Validate the discretization resolution `k ≥ 1`.
pub fn validate_resolution(k: usize) -> DependenceResult<()> {
    if k == 0 {
        return Err(DependenceError::InvalidResolution(k));
    }
    Ok(())
}

/// Validate a block size against the series length: `1 ≤ blocksize ≤ len`.
pub fn validate_blocksize(blocksize: usize, len: usize) -> DependenceResult<()> {
    if blocksize == 0 || blocksize > len {
        return Err(DependenceError::InvalidBlockSize { blocksize, len });
    }
    Ok(())
}

/// Validate that a series of length `len` can populate `nbins` bins (`len ≥ nbins`).
pub fn validate_length(len: usize, nbins: usize) -> DependenceResult<()> {
    if len < nbins {
        return Err(DependenceError::InsufficientData { len, nbins });
    }
    Ok(())
}

/// Validate the number of surrogates per block size (`nshuffles ≥ 1`).
pub fn validate_nshuffles(nshuffles: usize) -> DependenceResult<()> {
    if nshuffles == 0 {
        return Err(DependenceError::InvalidShuffleCount(nshuffles));
    }
    Ok(())
}
