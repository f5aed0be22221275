//! statistical_tests::entropy_rate — compression-based entropy-rate proxy.
//!
//! Purpose
//! -------
//! Measure how compressible a byte sequence is with a general-purpose
//! lossless compressor. The ratio compressed length / original length is an
//! empirical proxy for the per-symbol entropy rate of the source: structured
//! (dependent) sequences compress better than memoryless ones.
//!
//! Key behaviors
//! -------------
//! - Define the [`Compressor`] capability (`compress(bytes) -> bytes`) that
//!   every backend implements.
//! - Provide the closed, extensible [`CompressionMethod`] enumeration of
//!   built-in backends (LZMA, bzip2, zlib, zstd), selectable by name via
//!   `FromStr`.
//! - Compute the ratio with [`entropy_rate`] (built-in backend) or
//!   [`entropy_rate_with`] (any `Compressor`), and sweep resolutions with
//!   [`entropy_rate_profile`].
//!
//! Invariants & assumptions
//! ------------------------
//! - The estimate is a compressibility ratio, not an exact Shannon or
//!   Kolmogorov entropy. It is nominally in (0, 1] but may slightly exceed
//!   1 on tiny or incompressible inputs because of container headers.
//! - Backends are deterministic: the same input always yields the same
//!   compressed length. Failures are therefore never retried.
//!
//! Conventions
//! -----------
//! - Compression levels are fixed per backend so that estimates are
//!   comparable across calls: LZMA preset 9 in the legacy `.lzma`
//!   container, bzip2 level 9, zlib best, zstd level 19.
//! - Backend I/O errors are mapped into
//!   `DependenceError::CompressorFailure { method, reason }`.
//!
//! Downstream usage
//! ----------------
//! - The dependogram engine calls [`entropy_rate`] once for the observed
//!   sequence and once per surrogate.
//! - New backends either extend [`CompressionMethod`] or implement
//!   [`Compressor`] directly; callers of [`entropy_rate_with`] do not change.
//!
//! Testing notes
//! -------------
//! - Unit tests check that constant input compresses towards 0, uniformly
//!   random bytes stay near 1, name parsing, and empty-input rejection.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::statistical_tests::discretize::{discretize, to_bytes};
use crate::statistical_tests::errors::{DependenceError, DependenceResult};

/// LZMA preset used for the legacy `.lzma` container.
const LZMA_PRESET: u32 = 9;

/// zstd level; high enough that the ratio tracks redundancy rather than speed.
const ZSTD_LEVEL: i32 = 19;

/// Compressor — lossless compression capability used for entropy estimation.
///
/// Implementors must be deterministic and thread-safe; the engine may call
/// `compress` concurrently from several workers.
pub trait Compressor: Send + Sync {
    /// Short backend name used in error messages and logs.
    fn name(&self) -> &'static str;

    /// Compress `bytes` and return the complete encoded stream.
    fn compress(&self, bytes: &[u8]) -> DependenceResult<Vec<u8>>;
}

/// CompressionMethod — built-in compression backends.
///
/// Variants
/// --------
/// - `Lzma`
///   LZMA in the legacy "alone" container at preset 9 (default).
/// - `Bz2`
///   bzip2 at level 9.
/// - `Zlib`
///   DEFLATE in a zlib wrapper at the best level.
/// - `Zstd`
///   Zstandard at level 19.
///
/// Notes
/// -----
/// - Parsed case-insensitively from `"lzma"`/`"xz"`, `"bz2"`/`"bzip2"`,
///   `"zlib"`/`"deflate"`, and `"zstd"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompressionMethod {
    #[default]
    Lzma,
    Bz2,
    Zlib,
    Zstd,
}

impl CompressionMethod {
    /// All built-in backends, in declaration order.
    pub const ALL: [CompressionMethod; 4] = [
        CompressionMethod::Lzma,
        CompressionMethod::Bz2,
        CompressionMethod::Zlib,
        CompressionMethod::Zstd,
    ];
}

impl FromStr for CompressionMethod {
    type Err = DependenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lzma" | "xz" => Ok(CompressionMethod::Lzma),
            "bz2" | "bzip2" => Ok(CompressionMethod::Bz2),
            "zlib" | "deflate" => Ok(CompressionMethod::Zlib),
            "zstd" => Ok(CompressionMethod::Zstd),
            _ => Err(DependenceError::UnknownMethod(s.to_string())),
        }
    }
}

impl fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Compressor for CompressionMethod {
    fn name(&self) -> &'static str {
        match self {
            CompressionMethod::Lzma => "lzma",
            CompressionMethod::Bz2 => "bz2",
            CompressionMethod::Zlib => "zlib",
            CompressionMethod::Zstd => "zstd",
        }
    }

    fn compress(&self, bytes: &[u8]) -> DependenceResult<Vec<u8>> {
        let fail =
            |reason: String| DependenceError::CompressorFailure { method: self.name(), reason };
        match self {
            CompressionMethod::Lzma => {
                let options = xz2::stream::LzmaOptions::new_preset(LZMA_PRESET)
                    .map_err(|e| fail(e.to_string()))?;
                let stream = xz2::stream::Stream::new_lzma_encoder(&options)
                    .map_err(|e| fail(e.to_string()))?;
                let mut encoder = xz2::write::XzEncoder::new_stream(Vec::new(), stream);
                encoder.write_all(bytes).map_err(|e| fail(e.to_string()))?;
                encoder.finish().map_err(|e| fail(e.to_string()))
            }
            CompressionMethod::Bz2 => {
                let mut encoder =
                    bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::best());
                encoder.write_all(bytes).map_err(|e| fail(e.to_string()))?;
                encoder.finish().map_err(|e| fail(e.to_string()))
            }
            CompressionMethod::Zlib => {
                let mut encoder =
                    flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::best());
                encoder.write_all(bytes).map_err(|e| fail(e.to_string()))?;
                encoder.finish().map_err(|e| fail(e.to_string()))
            }
            CompressionMethod::Zstd => {
                zstd::stream::encode_all(bytes, ZSTD_LEVEL).map_err(|e| fail(e.to_string()))
            }
        }
    }
}

/// Estimate the entropy rate of `bytes` with a built-in backend.
///
/// Parameters
/// ----------
/// - `bytes`: `&[u8]`
///   Non-empty byte sequence, typically the one-byte-per-symbol encoding of
///   a discretized series.
/// - `method`: [`CompressionMethod`]
///   Backend to use.
///
/// Returns
/// -------
/// `DependenceResult<f64>`
///   `len(compress(bytes)) / len(bytes)`.
///
/// Errors
/// ------
/// - `DependenceError::EmptyPayload` when `bytes` is empty.
/// - `DependenceError::CompressorFailure` when the backend fails.
///
/// Examples
/// --------
/// ```rust
/// use rust_dependogram::statistical_tests::entropy_rate::{entropy_rate, CompressionMethod};
///
/// let constant = vec![7u8; 100_000];
/// let rate = entropy_rate(&constant, CompressionMethod::Lzma).unwrap();
/// assert!(rate < 0.01);
/// ```
pub fn entropy_rate(bytes: &[u8], method: CompressionMethod) -> DependenceResult<f64> {
    entropy_rate_with(bytes, &method)
}

/// Estimate the entropy rate of `bytes` with any [`Compressor`].
pub fn entropy_rate_with(bytes: &[u8], compressor: &dyn Compressor) -> DependenceResult<f64> {
    if bytes.is_empty() {
        return Err(DependenceError::EmptyPayload);
    }
    let compressed = compressor.compress(bytes)?;
    Ok(compressed.len() as f64 / bytes.len() as f64)
}

/// Entropy rate of a real-valued series at several discretization resolutions.
///
/// Parameters
/// ----------
/// - `data`: `&[f64]`
///   Finite, non-empty series.
/// - `resolutions`: `&[usize]`
///   Bin counts k to evaluate, each ≥ 1. Output preserves this order.
/// - `method`: [`CompressionMethod`]
///   Backend to use.
///
/// Returns
/// -------
/// `DependenceResult<Vec<(usize, f64)>>`
///   `(k, rate)` pairs. Coarser alphabets compress better, so the rate
///   typically increases with k.
///
/// Errors
/// ------
/// - Any error from [`discretize`] or [`entropy_rate`].
pub fn entropy_rate_profile(
    data: &[f64], resolutions: &[usize], method: CompressionMethod,
) -> DependenceResult<Vec<(usize, f64)>> {
    resolutions
        .iter()
        .map(|&k| {
            let bytes = to_bytes(&discretize(data, k)?);
            Ok((k, entropy_rate(&bytes, method)?))
        })
        .collect()
}
