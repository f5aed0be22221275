//! statistical_tests::dependogram — Monte Carlo block-shuffle dependence test.
//!
//! Purpose
//! -------
//! Test a real-valued series for serial dependence without a parametric
//! model. The series is discretized, its entropy rate is estimated by
//! compression, and the estimate is compared with the entropy rates of
//! block-shuffled surrogates at a range of block sizes. The result is a
//! *dependogram*: one empirical p-value per block size.
//!
//! Key behaviors
//! -------------
//! - Resolve the block-size schedule (explicit, or a logarithmic default
//!   from [`default_blocksizes`]).
//! - Discretize and encode the series once, estimate the observed entropy
//!   rate once.
//! - For each block size b, draw `nshuffles` surrogates, each from a private
//!   generator seeded with `trial_seed(seed, b, trial)`, and collect their
//!   entropy rates into a [`NullDistribution`].
//! - Compute p(b) = 1 − #{i : null_i − observed > 0} / nshuffles.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every p-value lies in [0, 1].
//! - Strict inequality: a surrogate tying the observed estimate does not
//!   count as more complex. At b = n the shuffle is the identity, every test
//!   statistic is 0, and p(n) = 1.
//! - Any failing trial aborts the whole computation; a partial null
//!   distribution would bias the p-value.
//! - Given a seed, results are identical with and without the `parallel`
//!   feature because each trial owns its generator.
//!
//! Conventions
//! -----------
//! - Shuffling commutes with the per-symbol byte encoding, so surrogates are
//!   built by block-shuffling the encoded bytes directly.
//! - Low p(b) means the observed series is more compressible than
//!   surrogates that are independent beyond b, i.e. evidence of dependence
//!   at or beyond lag b.
//! - Logging goes through `tracing`: `info!` for the observed estimate and
//!   effective seed, `debug!` per block size.
//!
//! Downstream usage
//! ----------------
//! - Build [`DependogramOptions`] (or use `Default`) and call
//!   [`dependogram`]. The returned [`DependogramOutcome`] carries p-values,
//!   null distributions (for external plotting), the effective seed, and
//!   Monte Carlo error intervals via
//!   [`DependogramOutcome::p_value_interval`].
//!
//! Testing notes
//! -------------
//! - Unit tests cover option validation, the default schedule, the p = 1
//!   boundary at b = n, tie handling on constant input, seeded
//!   reproducibility, deadlines, and detection of strong AR(1) dependence.
//! - Integration tests in `tests/` exercise calibration on i.i.d. input and
//!   the full pipeline across backends.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::statistical_tests::block_shuffle::{block_shuffle_into, trial_seed};
use crate::statistical_tests::discretize::{discretize, to_bytes};
use crate::statistical_tests::entropy_rate::{CompressionMethod, entropy_rate};
use crate::statistical_tests::errors::{DependenceError, DependenceResult};
use crate::statistical_tests::validation::{
    validate_blocksize, validate_length, validate_nshuffles, validate_resolution,
    validate_sequence,
};

/// Default number of surrogates per block size.
pub const DEFAULT_NSHUFFLES: usize = 100;

/// Default discretization resolution (one full byte per symbol).
pub const DEFAULT_NBINS: usize = 256;

/// Number of points in the default logarithmic block-size schedule.
pub const DEFAULT_SCHEDULE_STEPS: usize = 6;

/// DependogramOptions — configuration of a dependogram run.
///
/// Fields
/// ------
/// - `blocksizes`: `Option<Vec<usize>>`
///   Block sizes to test. `None` (or an empty list) selects
///   [`default_blocksizes`]. Each entry must satisfy 1 ≤ b ≤ n; duplicates
///   are removed and the schedule is sorted.
/// - `nshuffles`: `usize`
///   Surrogates per block size (≥ 1). Default 100.
/// - `nbins`: `usize`
///   Discretization resolution k (≥ 1, and at most the series length).
///   Default 256; values above 256 alias in the byte encoding and are
///   warned about.
/// - `method`: [`CompressionMethod`]
///   Compression backend. Default LZMA.
/// - `seed`: `Option<u64>`
///   Master seed. `None` draws one from the thread-local generator and
///   records it in the outcome so the run can be replayed.
/// - `deadline`: `Option<Duration>`
///   Wall-clock budget for the whole run; exceeding it aborts with
///   `DependenceError::DeadlineExceeded`.
///
/// Notes
/// -----
/// - [`DependogramOptions::new`] validates the scalar fields; the `with_*`
///   builders do not, and [`dependogram`] re-validates everything against
///   the actual series length.
#[derive(Debug, Clone, PartialEq)]
pub struct DependogramOptions {
    pub blocksizes: Option<Vec<usize>>,
    pub nshuffles: usize,
    pub nbins: usize,
    pub method: CompressionMethod,
    pub seed: Option<u64>,
    pub deadline: Option<Duration>,
}

impl Default for DependogramOptions {
    fn default() -> Self {
        DependogramOptions {
            blocksizes: None,
            nshuffles: DEFAULT_NSHUFFLES,
            nbins: DEFAULT_NBINS,
            method: CompressionMethod::default(),
            seed: None,
            deadline: None,
        }
    }
}

impl DependogramOptions {
    /// Construct validated options.
    ///
    /// Errors
    /// ------
    /// - `DependenceError::InvalidShuffleCount` when `nshuffles == 0`.
    /// - `DependenceError::InvalidResolution` when `nbins == 0`.
    ///
    /// Notes
    /// -----
    /// - Block sizes and the length-vs-bins requirement depend on the series
    ///   and are checked by [`dependogram`].
    ///
    /// Examples
    /// --------
    /// ```rust
    /// use rust_dependogram::statistical_tests::dependogram::DependogramOptions;
    /// use rust_dependogram::statistical_tests::entropy_rate::CompressionMethod;
    ///
    /// let opts =
    ///     DependogramOptions::new(Some(vec![1, 10]), 50, 16, CompressionMethod::Bz2, Some(7))
    ///         .unwrap();
    /// assert_eq!(opts.nshuffles, 50);
    /// assert!(DependogramOptions::new(None, 0, 16, CompressionMethod::Bz2, None).is_err());
    /// ```
    pub fn new(
        blocksizes: Option<Vec<usize>>, nshuffles: usize, nbins: usize, method: CompressionMethod,
        seed: Option<u64>,
    ) -> DependenceResult<Self> {
        validate_nshuffles(nshuffles)?;
        validate_resolution(nbins)?;
        Ok(DependogramOptions { blocksizes, nshuffles, nbins, method, seed, deadline: None })
    }

    pub fn with_blocksizes(mut self, blocksizes: Vec<usize>) -> Self {
        self.blocksizes = Some(blocksizes);
        self
    }

    pub fn with_nshuffles(mut self, nshuffles: usize) -> Self {
        self.nshuffles = nshuffles;
        self
    }

    pub fn with_nbins(mut self, nbins: usize) -> Self {
        self.nbins = nbins;
        self
    }

    pub fn with_method(mut self, method: CompressionMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// NullDistribution — surrogate entropy rates at one block size.
#[derive(Debug, Clone, PartialEq)]
pub struct NullDistribution {
    blocksize: usize,
    estimates: Vec<f64>,
}

impl NullDistribution {
    /// Wrap the surrogate estimates of one block size.
    ///
    /// Errors
    /// ------
    /// - `DependenceError::InvalidShuffleCount(0)` when `estimates` is empty;
    ///   summaries and the p-value are undefined without surrogates.
    pub fn new(blocksize: usize, estimates: Vec<f64>) -> DependenceResult<Self> {
        validate_nshuffles(estimates.len())?;
        Ok(NullDistribution { blocksize, estimates })
    }

    pub fn blocksize(&self) -> usize {
        self.blocksize
    }

    /// Surrogate estimates in trial order.
    pub fn estimates(&self) -> &[f64] {
        &self.estimates
    }

    pub fn len(&self) -> usize {
        self.estimates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.estimates.is_empty()
    }

    pub fn mean(&self) -> f64 {
        self.estimates.iter().sum::<f64>() / self.estimates.len() as f64
    }

    /// Sample standard deviation (n − 1 denominator; 0 for a single trial).
    pub fn std_dev(&self) -> f64 {
        let n = self.estimates.len();
        if n < 2 {
            return 0.0;
        }
        let mean = self.mean();
        let ss: f64 = self.estimates.iter().map(|x| (x - mean).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    }

    pub fn min(&self) -> f64 {
        self.estimates.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.estimates.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Test statistics `null_i − observed`, in trial order.
    pub fn test_statistics(&self, observed: f64) -> Vec<f64> {
        self.estimates.iter().map(|x| x - observed).collect()
    }

    /// Empirical p-value 1 − #{null_i − observed > 0} / len (strict inequality).
    pub fn p_value(&self, observed: f64) -> f64 {
        let exceed = self.estimates.iter().filter(|&&x| x - observed > 0.0).count();
        1.0 - exceed as f64 / self.estimates.len() as f64
    }
}

/// DependogramOutcome — result of a dependogram run.
///
/// Fields
/// ------
/// - `observed`: entropy rate of the discretized observed series.
/// - `seed`: effective master seed (replays the run when passed back in).
/// - `method`, `nbins`, `nshuffles`: configuration actually used.
/// - `nulls`: null distribution per block size.
/// - `p_values`: empirical p-value per block size, each in [0, 1].
///
/// Invariants
/// ----------
/// - `nulls` and `p_values` share the same, sorted key set.
/// - Every null distribution holds exactly `nshuffles` estimates.
#[derive(Debug, Clone, PartialEq)]
pub struct DependogramOutcome {
    observed: f64,
    seed: u64,
    method: CompressionMethod,
    nbins: usize,
    nshuffles: usize,
    nulls: BTreeMap<usize, NullDistribution>,
    p_values: BTreeMap<usize, f64>,
}

impl DependogramOutcome {
    pub fn observed(&self) -> f64 {
        self.observed
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn method(&self) -> CompressionMethod {
        self.method
    }

    pub fn nbins(&self) -> usize {
        self.nbins
    }

    pub fn nshuffles(&self) -> usize {
        self.nshuffles
    }

    /// The dependogram: block size → p-value, ordered by block size.
    pub fn p_values(&self) -> &BTreeMap<usize, f64> {
        &self.p_values
    }

    pub fn p_value(&self, blocksize: usize) -> Option<f64> {
        self.p_values.get(&blocksize).copied()
    }

    pub fn null_distribution(&self, blocksize: usize) -> Option<&NullDistribution> {
        self.nulls.get(&blocksize)
    }

    /// Tested block sizes in increasing order.
    pub fn blocksizes(&self) -> Vec<usize> {
        self.p_values.keys().copied().collect()
    }

    /// Wilson score interval for the Monte Carlo p-value at `blocksize`.
    ///
    /// Parameters
    /// ----------
    /// - `blocksize`: `usize`
    ///   A tested block size.
    /// - `confidence`: `f64`
    ///   Two-sided confidence level in (0, 1), e.g. 0.95.
    ///
    /// Returns
    /// -------
    /// `DependenceResult<Option<(f64, f64)>>`
    ///   `Ok(None)` when `blocksize` was not tested; otherwise the interval
    ///   `(lo, hi)` with 0 ≤ lo ≤ p ≤ hi ≤ 1 reflecting the finite number of
    ///   surrogates.
    ///
    /// Errors
    /// ------
    /// - `DependenceError::InvalidConfidence` when `confidence ∉ (0, 1)`.
    pub fn p_value_interval(
        &self, blocksize: usize, confidence: f64,
    ) -> DependenceResult<Option<(f64, f64)>> {
        if !(confidence > 0.0 && confidence < 1.0) {
            return Err(DependenceError::InvalidConfidence(confidence));
        }
        let Some(p) = self.p_value(blocksize) else {
            return Ok(None);
        };

        let z = Normal::new(0.0, 1.0)
            .expect("standard normal parameters are valid")
            .inverse_cdf(0.5 + confidence / 2.0);
        let n = self.nshuffles as f64;
        let z2 = z * z;
        let denom = 1.0 + z2 / n;
        let center = (p + z2 / (2.0 * n)) / denom;
        let half = z / denom * (p * (1.0 - p) / n + z2 / (4.0 * n * n)).sqrt();
        Ok(Some(((center - half).clamp(0.0, p), (center + half).clamp(p, 1.0))))
    }
}

/// Default logarithmic block-size schedule for a series of length `n`.
///
/// Returns `DEFAULT_SCHEDULE_STEPS` points 10^(i · log₁₀(n / 3) / 5),
/// i = 0..5, rounded, clamped to [1, n], sorted and deduplicated. The first
/// entry is always 1; for n ≤ 4 the schedule collapses to `[1]`.
///
/// Examples
/// --------
/// ```rust
/// use rust_dependogram::statistical_tests::dependogram::default_blocksizes;
///
/// assert_eq!(default_blocksizes(300), vec![1, 3, 6, 16, 40, 100]);
/// assert_eq!(default_blocksizes(2), vec![1]);
/// ```
pub fn default_blocksizes(n: usize) -> Vec<usize> {
    let top = (n as f64 / 3.0).max(1.0).log10();
    let last = (DEFAULT_SCHEDULE_STEPS - 1) as f64;
    let mut schedule: Vec<usize> = (0..DEFAULT_SCHEDULE_STEPS)
        .map(|i| 10f64.powf(top * i as f64 / last).round() as usize)
        .map(|b| b.clamp(1, n.max(1)))
        .collect();
    schedule.dedup();
    schedule
}

/// Run the block-shuffle dependence test.
///
/// Parameters
/// ----------
/// - `data`: `&[f64]`
///   Observed series (e.g. log-returns); non-empty and finite.
/// - `options`: `&DependogramOptions`
///   Block sizes, number of surrogates, resolution, backend, seed, deadline.
///
/// Returns
/// -------
/// `DependenceResult<DependogramOutcome>`
///   Observed entropy rate, null distributions, and p-values per block size.
///
/// Errors
/// ------
/// - Input validation: `EmptySequence`, `NonFiniteValue`,
///   `InvalidResolution`, `InvalidShuffleCount`, `InvalidBlockSize`
///   (any explicit block size outside 1 ≤ b ≤ n), `InsufficientData`
///   (fewer observations than bins).
/// - `CompressorFailure` from any trial, aborting the run.
/// - `DeadlineExceeded` when `options.deadline` elapses.
///
/// Examples
/// --------
/// ```rust
/// use rust_dependogram::statistical_tests::dependogram::{dependogram, DependogramOptions};
///
/// let data: Vec<f64> = (0..500).map(|i| ((i * 37) % 101) as f64).collect();
/// let opts = DependogramOptions::default()
///     .with_blocksizes(vec![1, 500])
///     .with_nshuffles(10)
///     .with_seed(1);
/// let outcome = dependogram(&data, &opts).unwrap();
///
/// assert_eq!(outcome.p_value(500), Some(1.0));
/// assert!(outcome.p_values().values().all(|p| (0.0..=1.0).contains(p)));
/// ```
pub fn dependogram(
    data: &[f64], options: &DependogramOptions,
) -> DependenceResult<DependogramOutcome> {
    validate_sequence(data)?;
    validate_resolution(options.nbins)?;
    validate_nshuffles(options.nshuffles)?;
    let blocksizes = resolve_blocksizes(options.blocksizes.as_deref(), data.len())?;
    validate_length(data.len(), options.nbins)?;

    let budget = Budget::start(options.deadline);
    let seed = options.seed.unwrap_or_else(|| rand::rng().random());

    let encoded = to_bytes(&discretize(data, options.nbins)?);
    let observed = entropy_rate(&encoded, options.method)?;
    info!(
        n = data.len(),
        nbins = options.nbins,
        method = %options.method,
        seed,
        observed,
        "observed entropy rate"
    );

    let mut nulls = BTreeMap::new();
    let mut p_values = BTreeMap::new();
    for blocksize in blocksizes {
        let null = NullDistribution::new(
            blocksize,
            null_estimates(&encoded, blocksize, options, seed, &budget)?,
        )?;
        let p_value = null.p_value(observed);
        debug!(
            blocksize,
            null_mean = null.mean(),
            null_sd = null.std_dev(),
            p_value,
            "block size done"
        );
        p_values.insert(blocksize, p_value);
        nulls.insert(blocksize, null);
    }

    Ok(DependogramOutcome {
        observed,
        seed,
        method: options.method,
        nbins: options.nbins,
        nshuffles: options.nshuffles,
        nulls,
        p_values,
    })
}

//
// ---------- Private helpers ----------
//

/// Wall-clock budget shared by all trials of a run.
struct Budget {
    started: Instant,
    deadline: Option<Duration>,
}

impl Budget {
    fn start(deadline: Option<Duration>) -> Self {
        Budget { started: Instant::now(), deadline }
    }

    fn check(&self, blocksize: usize, trial: usize) -> DependenceResult<()> {
        match self.deadline {
            Some(limit) if self.started.elapsed() >= limit => {
                Err(DependenceError::DeadlineExceeded {
                    elapsed_ms: self.started.elapsed().as_millis(),
                    blocksize,
                    trial,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Validate, sort, and deduplicate an explicit schedule, or build the default.
fn resolve_blocksizes(explicit: Option<&[usize]>, n: usize) -> DependenceResult<Vec<usize>> {
    match explicit {
        Some(list) if !list.is_empty() => {
            for &blocksize in list {
                validate_blocksize(blocksize, n)?;
            }
            let mut schedule = list.to_vec();
            schedule.sort_unstable();
            schedule.dedup();
            Ok(schedule)
        }
        _ => Ok(default_blocksizes(n)),
    }
}

/// Entropy rate of one surrogate, drawn from the trial's private generator.
fn surrogate_rate(
    encoded: &[u8], blocksize: usize, method: CompressionMethod, seed: u64, trial: usize,
    buffer: &mut Vec<u8>,
) -> DependenceResult<f64> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(trial_seed(seed, blocksize, trial));
    block_shuffle_into(encoded, blocksize, &mut rng, buffer)?;
    entropy_rate(buffer, method)
}

#[cfg(not(feature = "parallel"))]
fn null_estimates(
    encoded: &[u8], blocksize: usize, options: &DependogramOptions, seed: u64, budget: &Budget,
) -> DependenceResult<Vec<f64>> {
    let mut buffer = Vec::with_capacity(encoded.len());
    (0..options.nshuffles)
        .map(|trial| {
            budget.check(blocksize, trial)?;
            surrogate_rate(encoded, blocksize, options.method, seed, trial, &mut buffer)
        })
        .collect()
}

#[cfg(feature = "parallel")]
fn null_estimates(
    encoded: &[u8], blocksize: usize, options: &DependogramOptions, seed: u64, budget: &Budget,
) -> DependenceResult<Vec<f64>> {
    (0..options.nshuffles)
        .into_par_iter()
        .map_init(
            || Vec::with_capacity(encoded.len()),
            |buffer, trial| {
                budget.check(blocksize, trial)?;
                surrogate_rate(encoded, blocksize, options.method, seed, trial, buffer)
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Option construction/validation and the default schedule.
    // - p = 1 at b = n and on constant input (strict-inequality ties).
    // - p-value range, null distribution sizes and summaries.
    // - Seeded reproducibility and recording of drawn seeds.
    // - Deadline and invalid block-size failures.
    // - Detection of strong AR(1) dependence at short block sizes.
    //
    // They intentionally DO NOT cover:
    // - Calibration on i.i.d. input across many runs; see the integration
    //   tests under `tests/`.
    // -------------------------------------------------------------------------

    /// AR(1) path x_t = φ x_{t−1} + ε_t with uniform(−1, 1) innovations.
    fn ar1(n: usize, phi: f64, seed: u64) -> Vec<f64> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut x = 0.0;
        (0..n)
            .map(|_| {
                x = phi * x + rng.random_range(-1.0..1.0);
                x
            })
            .collect()
    }

    #[test]
    // Purpose
    // -------
    // Pin the default logarithmic schedule.
    //
    // Given
    // -----
    // - n = 300, n = 3000, and tiny n.
    //
    // Expect
    // ------
    // - Six log-spaced points from 1 to n/3; collapse to [1] for tiny n.
    fn default_blocksizes_is_log_spaced_up_to_a_third() {
        assert_eq!(default_blocksizes(300), vec![1, 3, 6, 16, 40, 100]);
        assert_eq!(default_blocksizes(3000), vec![1, 4, 16, 63, 251, 1000]);
        assert_eq!(default_blocksizes(1), vec![1]);
        assert_eq!(default_blocksizes(4), vec![1]);
        assert_eq!(default_blocksizes(5), vec![1, 2]);
    }

    #[test]
    // Purpose
    // -------
    // `DependogramOptions::new` validates scalar fields and leaves
    // length-dependent checks to the engine.
    //
    // Given
    // -----
    // - nshuffles = 0, nbins = 0, an explicit block size of 0, and a valid set.
    //
    // Expect
    // ------
    // - Errors for the scalar cases; the zero block size is kept for the
    //   engine to reject; defaults for deadline on success.
    fn options_new_validates_fields() {
        let m = CompressionMethod::Lzma;
        assert_eq!(
            DependogramOptions::new(None, 0, 8, m, None),
            Err(DependenceError::InvalidShuffleCount(0))
        );
        assert_eq!(
            DependogramOptions::new(None, 10, 0, m, None),
            Err(DependenceError::InvalidResolution(0))
        );
        let deferred = DependogramOptions::new(Some(vec![4, 0]), 10, 8, m, None).unwrap();
        assert_eq!(deferred.blocksizes, Some(vec![4, 0]));
        let ok = DependogramOptions::new(Some(vec![2]), 10, 8, m, Some(1)).unwrap();
        assert_eq!(ok.deadline, None);
        assert_eq!(ok.seed, Some(1));
    }

    #[test]
    // Purpose
    // -------
    // At b = n the surrogate is the observed sequence, so p = 1.
    //
    // Given
    // -----
    // - A strongly dependent AR(1) path of length 800 and b ∈ {1, 800}.
    //
    // Expect
    // ------
    // - p(800) = 1 and every null estimate equals the observed estimate.
    fn dependogram_full_length_block_gives_p_one() {
        // Arrange
        let data = ar1(800, 0.9, 1);
        let opts = DependogramOptions::default()
            .with_blocksizes(vec![800, 1])
            .with_nshuffles(15)
            .with_nbins(8)
            .with_seed(3);

        // Act
        let outcome = dependogram(&data, &opts).unwrap();

        // Assert
        assert_eq!(outcome.blocksizes(), vec![1, 800]);
        assert_eq!(outcome.p_value(800), Some(1.0));
        let null = outcome.null_distribution(800).unwrap();
        assert_eq!(null.len(), 15);
        assert!(null.test_statistics(outcome.observed()).iter().all(|&t| t == 0.0));
    }

    #[test]
    // Purpose
    // -------
    // Ties with the observed estimate never count as rejections.
    //
    // Given
    // -----
    // - A constant series (all surrogates identical to the observed one).
    //
    // Expect
    // ------
    // - p = 1 at every default block size; null sd = 0.
    fn dependogram_constant_series_ties_give_p_one() {
        // Arrange
        let data = vec![0.25; 600];
        let opts = DependogramOptions::default().with_nshuffles(5).with_seed(0);

        // Act
        let outcome = dependogram(&data, &opts).unwrap();

        // Assert
        assert_eq!(outcome.blocksizes(), default_blocksizes(600));
        for (&b, &p) in outcome.p_values() {
            assert_eq!(p, 1.0, "block size {b}");
            assert_eq!(outcome.null_distribution(b).unwrap().std_dev(), 0.0);
        }
    }

    #[test]
    // Purpose
    // -------
    // Strong short-range dependence is detected at small block sizes.
    //
    // Given
    // -----
    // - AR(1) with φ = 0.9, n = 4000, k = 4, b ∈ {1, 2}, 30 surrogates.
    //
    // Expect
    // ------
    // - p(1) = p(2) = 0: every surrogate is less compressible.
    fn dependogram_detects_strong_ar1_dependence() {
        // Arrange
        let data = ar1(4000, 0.9, 42);
        let opts = DependogramOptions::default()
            .with_blocksizes(vec![1, 2])
            .with_nshuffles(30)
            .with_nbins(4)
            .with_seed(7);

        // Act
        let outcome = dependogram(&data, &opts).unwrap();

        // Assert
        assert_eq!(outcome.p_value(1), Some(0.0));
        assert_eq!(outcome.p_value(2), Some(0.0));
        let null = outcome.null_distribution(1).unwrap();
        assert!(null.min() > outcome.observed());
    }

    #[test]
    // Purpose
    // -------
    // A fixed seed reproduces the run; a drawn seed is recorded and replays it.
    //
    // Given
    // -----
    // - Two runs with seed 11, one run without a seed and its replay.
    //
    // Expect
    // ------
    // - Identical outcomes in both pairs.
    fn dependogram_is_reproducible_from_seed() {
        // Arrange
        let data = ar1(500, 0.3, 5);
        let seeded = DependogramOptions::default()
            .with_blocksizes(vec![1, 5, 25])
            .with_nshuffles(8)
            .with_nbins(16)
            .with_method(CompressionMethod::Bz2)
            .with_seed(11);
        let unseeded = DependogramOptions { seed: None, ..seeded.clone() };

        // Act
        let a = dependogram(&data, &seeded).unwrap();
        let b = dependogram(&data, &seeded).unwrap();
        let drawn = dependogram(&data, &unseeded).unwrap();
        let replay = dependogram(&data, &unseeded.clone().with_seed(drawn.seed())).unwrap();

        // Assert
        assert_eq!(a, b);
        assert_eq!(a.seed(), 11);
        assert_eq!(drawn, replay);
        assert_eq!(a.method(), CompressionMethod::Bz2);
        assert_eq!(a.nbins(), 16);
    }

    #[test]
    // Purpose
    // -------
    // Each trial depends only on its own derived seed, so the null matches a
    // trial-by-trial recomputation whatever the execution order.
    //
    // Given
    // -----
    // - A seeded run at b = 7 with 12 surrogates (sequential or `parallel`).
    //
    // Expect
    // ------
    // - Estimates equal `entropy_rate(block_shuffle(bytes, 7, rng_i))` with
    //   rng_i seeded from `trial_seed(seed, 7, i)`, in trial order.
    fn dependogram_null_matches_per_trial_recomputation() {
        use crate::statistical_tests::block_shuffle::block_shuffle;

        // Arrange
        let data = ar1(350, 0.6, 13);
        let opts = DependogramOptions::default()
            .with_blocksizes(vec![7])
            .with_nshuffles(12)
            .with_nbins(32)
            .with_method(CompressionMethod::Zlib)
            .with_seed(2024);
        let encoded = to_bytes(&discretize(&data, 32).unwrap());

        // Act
        let outcome = dependogram(&data, &opts).unwrap();
        let expected: Vec<f64> = (0..12)
            .map(|trial| {
                let mut rng = Xoshiro256PlusPlus::seed_from_u64(trial_seed(2024, 7, trial));
                let surrogate = block_shuffle(&encoded, 7, &mut rng).unwrap();
                entropy_rate(&surrogate, CompressionMethod::Zlib).unwrap()
            })
            .collect();

        // Assert
        assert_eq!(outcome.null_distribution(7).unwrap().estimates(), expected.as_slice());
    }

    #[test]
    // Purpose
    // -------
    // Explicit block sizes outside [1, n] fail fast and report the real n.
    //
    // Given
    // -----
    // - n = 50, k = 8, and block sizes [10, 51] or [0, 10].
    //
    // Expect
    // ------
    // - `InvalidBlockSize { blocksize: 51, len: 50 }` and
    //   `InvalidBlockSize { blocksize: 0, len: 50 }`.
    fn dependogram_rejects_block_size_outside_range() {
        // Arrange
        let data = ar1(50, 0.0, 2);
        let opts = DependogramOptions::default().with_nbins(8).with_nshuffles(2);

        // Act
        let too_long = dependogram(&data, &opts.clone().with_blocksizes(vec![10, 51]));
        let zero = dependogram(&data, &opts.with_blocksizes(vec![0, 10]));

        // Assert
        assert_eq!(too_long, Err(DependenceError::InvalidBlockSize { blocksize: 51, len: 50 }));
        assert_eq!(zero, Err(DependenceError::InvalidBlockSize { blocksize: 0, len: 50 }));
    }

    #[test]
    // Purpose
    // -------
    // A series with fewer observations than bins is rejected.
    //
    // Given
    // -----
    // - Three observations with the default 256 bins, then with 3 bins.
    //
    // Expect
    // ------
    // - `InsufficientData { len: 3, nbins: 256 }`; k = 3 is accepted.
    fn dependogram_rejects_series_shorter_than_bins() {
        // Arrange
        let data = [0.1, 0.5, -0.2];
        let opts = DependogramOptions::default().with_nshuffles(3).with_seed(1);

        // Act
        let short = dependogram(&data, &opts);
        let coarse = dependogram(&data, &opts.clone().with_nbins(3));

        // Assert
        assert_eq!(short, Err(DependenceError::InsufficientData { len: 3, nbins: 256 }));
        assert!(coarse.is_ok(), "Got: {coarse:?}");
    }

    #[test]
    // Purpose
    // -------
    // An exhausted budget aborts without a partial dependogram.
    //
    // Given
    // -----
    // - A zero deadline.
    //
    // Expect
    // ------
    // - `DeadlineExceeded` at the first trial of the smallest block size.
    fn dependogram_zero_deadline_aborts() {
        // Arrange
        let data = ar1(300, 0.5, 3);
        let opts = DependogramOptions::default()
            .with_blocksizes(vec![3, 1])
            .with_nshuffles(4)
            .with_seed(1)
            .with_deadline(Duration::ZERO);

        // Act
        let result = dependogram(&data, &opts);

        // Assert
        match result {
            Err(DependenceError::DeadlineExceeded { blocksize, .. }) => assert_eq!(blocksize, 1),
            other => panic!("expected DeadlineExceeded, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Null distribution summaries and the strict-inequality p-value.
    //
    // Given
    // -----
    // - Estimates [0.4, 0.5, 0.6, 0.7] and observed 0.5.
    //
    // Expect
    // ------
    // - Two strict exceedances → p = 0.5; mean 0.55; min/max 0.4/0.7.
    fn null_distribution_summaries_and_p_value() {
        // Arrange
        let null = NullDistribution::new(3, vec![0.4, 0.5, 0.6, 0.7]).unwrap();

        // Act / Assert
        assert_eq!(null.blocksize(), 3);
        assert_relative_eq!(null.p_value(0.5), 0.5);
        assert_relative_eq!(null.mean(), 0.55, epsilon = 1e-12);
        assert_relative_eq!(null.std_dev(), 0.129_099_444_873_580_5, epsilon = 1e-12);
        assert_eq!(null.min(), 0.4);
        assert_eq!(null.max(), 0.7);
        assert_relative_eq!(null.p_value(0.7), 1.0);
        assert_relative_eq!(null.p_value(0.0), 0.0);
    }

    #[test]
    // Purpose
    // -------
    // A null distribution without surrogates cannot be built.
    //
    // Given
    // -----
    // - An empty estimate vector.
    //
    // Expect
    // ------
    // - `InvalidShuffleCount(0)` instead of a NaN p-value.
    fn null_distribution_rejects_empty_estimates() {
        assert_eq!(
            NullDistribution::new(3, Vec::new()),
            Err(DependenceError::InvalidShuffleCount(0))
        );
    }

    #[test]
    // Purpose
    // -------
    // The Wilson interval brackets the p-value and validates its level.
    //
    // Given
    // -----
    // - A small seeded run; confidence 0.95, an untested block size, and
    //   an invalid level.
    //
    // Expect
    // ------
    // - lo ≤ p ≤ hi within [0, 1]; `None` for untested; error for level 1.5.
    fn p_value_interval_brackets_estimate() {
        // Arrange
        let data = ar1(400, 0.2, 9);
        let opts = DependogramOptions::default()
            .with_blocksizes(vec![4])
            .with_nshuffles(20)
            .with_nbins(8)
            .with_seed(2);
        let outcome = dependogram(&data, &opts).unwrap();
        let p = outcome.p_value(4).unwrap();

        // Act
        let (lo, hi) = outcome.p_value_interval(4, 0.95).unwrap().unwrap();

        // Assert
        assert!(0.0 <= lo && lo <= p && p <= hi && hi <= 1.0, "({lo}, {p}, {hi})");
        assert!(hi - lo > 0.0);
        assert_eq!(outcome.p_value_interval(7, 0.95), Ok(None));
        assert_eq!(
            outcome.p_value_interval(4, 1.5),
            Err(DependenceError::InvalidConfidence(1.5))
        );
    }
}
