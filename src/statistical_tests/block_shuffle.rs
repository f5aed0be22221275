//! statistical_tests::block_shuffle — block-permutation surrogates.
//!
//! Purpose
//! -------
//! Build randomized surrogates of a sequence by permuting contiguous,
//! fixed-size windows. A surrogate keeps the marginal distribution and all
//! dependence at lags shorter than the block size, while association across
//! windows is randomized. Comparing a statistic on the observed sequence
//! with its distribution over surrogates therefore tests for dependence at
//! lags ≥ block size.
//!
//! Key behaviors
//! -------------
//! - Draw one uniform offset in [0, n mod b] deciding how many leading
//!   elements are dropped (the remaining leftovers are dropped at the end).
//! - Split the remaining b · ⌊n / b⌋ elements into ⌊n / b⌋ windows, draw one
//!   uniform permutation of the window indices, and concatenate the windows
//!   in that order with each window's internal order intact.
//! - Derive private, order-independent seeds per Monte Carlo trial with
//!   [`trial_seed`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Output length is exactly b · ⌊n / b⌋ ≤ n.
//! - Output is a permutation of whole windows; it is never an element-wise
//!   resample.
//! - With b = n the output equals the input.
//! - Randomness comes only from the caller-supplied generator, so results
//!   are reproducible given the generator state.
//!
//! Conventions
//! -----------
//! - Generic over the element type (`T: Copy`); the engine shuffles
//!   discretized symbols, but real-valued series work the same way.
//! - Generic over the generator (`R: Rng + ?Sized`), so callers can pass
//!   concrete generators or `&mut dyn RngCore`.
//!
//! Downstream usage
//! ----------------
//! - The dependogram engine calls [`block_shuffle_into`] with a reused
//!   buffer and a per-trial generator seeded from [`trial_seed`].
//!
//! Testing notes
//! -------------
//! - Unit tests pin the 1..=12, b = 4 example, the identity at b = n, the
//!   offset range, coverage of all window orders, and invalid block sizes.
//! - A property test checks the whole-window structure on random input.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::statistical_tests::errors::DependenceResult;
use crate::statistical_tests::validation::validate_blocksize;

/// Block-shuffle `data` with windows of length `blocksize`.
///
/// Parameters
/// ----------
/// - `data`: `&[T]`
///   Sequence of length n ≥ 1.
/// - `blocksize`: `usize`
///   Window length b; must satisfy 1 ≤ b ≤ n.
/// - `rng`: `&mut R`
///   Caller-owned random generator; one offset and one permutation are drawn.
///
/// Returns
/// -------
/// `DependenceResult<Vec<T>>`
///   A surrogate of length b · ⌊n / b⌋.
///
/// Errors
/// ------
/// - `DependenceError::InvalidBlockSize` when b = 0 or b > n.
///
/// Examples
/// --------
/// ```rust
/// use rand::SeedableRng;
/// use rand_xoshiro::Xoshiro256PlusPlus;
/// use rust_dependogram::statistical_tests::block_shuffle::block_shuffle;
///
/// let data: Vec<u32> = (1..=12).collect();
/// let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
/// let surrogate = block_shuffle(&data, 4, &mut rng).unwrap();
///
/// assert_eq!(surrogate.len(), 12);
/// for window in surrogate.chunks(4) {
///     assert_eq!(window[0] % 4, 1);
///     assert!(window.windows(2).all(|w| w[1] == w[0] + 1));
/// }
/// ```
pub fn block_shuffle<T, R>(data: &[T], blocksize: usize, rng: &mut R) -> DependenceResult<Vec<T>>
where
    T: Copy,
    R: Rng + ?Sized,
{
    let mut out = Vec::new();
    block_shuffle_into(data, blocksize, rng, &mut out)?;
    Ok(out)
}

/// Block-shuffle `data` into `out`, reusing its allocation.
///
/// `out` is cleared first; on success it holds b · ⌊n / b⌋ elements. See
/// [`block_shuffle`] for the construction and errors.
pub fn block_shuffle_into<T, R>(
    data: &[T], blocksize: usize, rng: &mut R, out: &mut Vec<T>,
) -> DependenceResult<()>
where
    T: Copy,
    R: Rng + ?Sized,
{
    validate_blocksize(blocksize, data.len())?;

    let n = data.len();
    let nblocks = n / blocksize;
    let offset = rng.random_range(0..=n % blocksize);

    let mut order: Vec<usize> = (0..nblocks).collect();
    order.shuffle(rng);

    out.clear();
    out.reserve(nblocks * blocksize);
    for block in order {
        let start = offset + block * blocksize;
        out.extend_from_slice(&data[start..start + blocksize]);
    }
    Ok(())
}

/// Derive the seed of Monte Carlo trial `trial` at block size `blocksize`.
///
/// Counter-based (SplitMix64 finalizer), so every (blocksize, trial) pair
/// gets its own stream regardless of the order or thread in which trials
/// run.
pub fn trial_seed(seed: u64, blocksize: usize, trial: usize) -> u64 {
    let z = seed
        .wrapping_add(splitmix64(blocksize as u64))
        .wrapping_add((trial as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    splitmix64(z)
}

#[inline]
fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
