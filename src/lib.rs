//! rust_dependogram — compression-based serial dependence tests with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the block-shuffle dependence test to Python. When the
//! `python-bindings` feature is enabled, this module defines the
//! Python-facing classes, functions, and the `statistical_tests` submodule.
//!
//! Key behaviors
//! -------------
//! - Re-export [`statistical_tests`] as the public crate surface.
//! - Define the `Dependogram` `#[pyclass]`, the `entropy_rate` /
//!   `entropy_rate_profile` `#[pyfunction]`s, and the `#[pymodule]`
//!   initializer.
//! - Register `rust_dependogram.statistical_tests` in `sys.modules` so
//!   dot-notation imports work.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner Rust modules; this file performs
//!   FFI glue and argument conversion only.
//! - Core errors are converted to `ValueError` via
//!   `From<DependenceError> for PyErr`.
//!
//! Conventions
//! -----------
//! - Compression backends are selected from Python by name (`"lzma"`,
//!   `"bz2"`, `"zlib"`, `"zstd"`, plus aliases).
//! - Long-running computations release the GIL.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code uses [`statistical_tests`] directly and can ignore the
//!   items gated behind `python-bindings`.
//! - From Python:
//!   `from rust_dependogram.statistical_tests import Dependogram`.
//!
//! Testing notes
//! -------------
//! - Numerical behavior is covered by unit tests in the inner modules and by
//!   the integration tests under `tests/`.

pub mod statistical_tests;
pub mod utils;

#[cfg(feature = "python-bindings")]
use std::collections::BTreeMap;

#[cfg(feature = "python-bindings")]
use numpy::PyReadonlyArray1;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    statistical_tests::{
        dependogram::{DependogramOutcome, dependogram},
        discretize::{discretize, to_bytes},
        entropy_rate::{self, CompressionMethod},
    },
    utils::{build_dependogram_options, extract_f64_array},
};

/// Borrow the contiguous slice behind an extracted array.
#[cfg(feature = "python-bindings")]
fn as_slice<'a>(arr: &'a PyReadonlyArray1<'_, f64>) -> PyResult<&'a [f64]> {
    arr.as_slice().map_err(|_| {
        PyValueError::new_err("expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64")
    })
}

/// Dependogram — Python-facing wrapper for the block-shuffle dependence test.
///
/// Purpose
/// -------
/// Run [`dependogram`] from Python and expose its outcome as read-only
/// properties and lookup methods.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `Dependogram(data, blocksizes=None, nshuffles=100, nbins=256, method="lzma",
/// seed=None, timeout=None)`:
/// - `data`: one-dimensional array-like of finite `float64` values.
/// - `blocksizes`: optional list of block sizes in `[1, len(data)]`;
///   `None` selects the logarithmic default schedule.
/// - `nshuffles`: surrogates per block size (≥ 1).
/// - `nbins`: discretization resolution (1 ≤ nbins ≤ len(data)).
/// - `method`: compression backend name.
/// - `seed`: optional master seed; the effective seed is exposed as `seed`.
/// - `timeout`: optional wall-clock budget in seconds.
///
/// Notes
/// -----
/// - The GIL is released while surrogates are compressed.
/// - Native Rust callers should call [`dependogram`] directly.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_dependogram.statistical_tests", frozen)]
pub struct Dependogram {
    inner: DependogramOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl Dependogram {
    #[new]
    #[pyo3(
        text_signature = "(data, /, blocksizes=None, nshuffles=100, nbins=256, method='lzma', \
                          seed=None, timeout=None)",
        signature = (
            raw_data,
            blocksizes = None,
            nshuffles = 100,
            nbins = 256,
            method = "lzma",
            seed = None,
            timeout = None
        )
    )]
    #[allow(clippy::too_many_arguments)]
    pub fn new<'py>(
        py: Python<'py>, raw_data: &Bound<'py, PyAny>, blocksizes: Option<Vec<usize>>,
        nshuffles: usize, nbins: usize, method: &str, seed: Option<u64>, timeout: Option<f64>,
    ) -> PyResult<Dependogram> {
        let opts = build_dependogram_options(blocksizes, nshuffles, nbins, method, seed, timeout)?;
        let arr = extract_f64_array(py, raw_data)?;
        let data = as_slice(&arr)?;

        let inner = py.allow_threads(|| dependogram(data, &opts))?;
        Ok(Dependogram { inner })
    }

    /// Block size → empirical p-value.
    #[getter]
    pub fn p_values(&self) -> BTreeMap<usize, f64> {
        self.inner.p_values().clone()
    }

    /// Entropy rate of the observed series.
    #[getter]
    pub fn observed(&self) -> f64 {
        self.inner.observed()
    }

    #[getter]
    pub fn blocksizes(&self) -> Vec<usize> {
        self.inner.blocksizes()
    }

    /// Effective master seed; pass it back to replay the run.
    #[getter]
    pub fn seed(&self) -> u64 {
        self.inner.seed()
    }

    #[getter]
    pub fn method(&self) -> String {
        self.inner.method().to_string()
    }

    #[getter]
    pub fn nbins(&self) -> usize {
        self.inner.nbins()
    }

    #[getter]
    pub fn nshuffles(&self) -> usize {
        self.inner.nshuffles()
    }

    /// Surrogate entropy rates at `blocksize` in trial order, or `None`.
    pub fn null_distribution(&self, blocksize: usize) -> Option<Vec<f64>> {
        self.inner.null_distribution(blocksize).map(|null| null.estimates().to_vec())
    }

    /// Wilson score interval `(lo, hi)` for the p-value at `blocksize`.
    #[pyo3(signature = (blocksize, confidence = 0.95))]
    pub fn p_value_interval(
        &self, blocksize: usize, confidence: f64,
    ) -> PyResult<Option<(f64, f64)>> {
        Ok(self.inner.p_value_interval(blocksize, confidence)?)
    }

    fn __repr__(&self) -> String {
        format!(
            "Dependogram(observed={:.4}, method='{}', nbins={}, nshuffles={}, p_values={:?})",
            self.inner.observed(),
            self.inner.method(),
            self.inner.nbins(),
            self.inner.nshuffles(),
            self.inner.p_values()
        )
    }
}

/// Entropy rate of a series discretized into `nbins` rank bins.
#[cfg(feature = "python-bindings")]
#[pyfunction(name = "entropy_rate")]
#[pyo3(signature = (raw_data, nbins = 256, method = "lzma"))]
fn py_entropy_rate<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>, nbins: usize, method: &str,
) -> PyResult<f64> {
    let method: CompressionMethod = method.parse()?;
    let arr = extract_f64_array(py, raw_data)?;
    let data = as_slice(&arr)?;
    let bytes = to_bytes(&discretize(data, nbins)?);
    Ok(entropy_rate::entropy_rate(&bytes, method)?)
}

/// `(nbins, rate)` pairs over several resolutions.
#[cfg(feature = "python-bindings")]
#[pyfunction(name = "entropy_rate_profile")]
#[pyo3(signature = (raw_data, resolutions = vec![2, 4, 8, 32, 256], method = "lzma"))]
fn py_entropy_rate_profile<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>, resolutions: Vec<usize>, method: &str,
) -> PyResult<Vec<(usize, f64)>> {
    let method: CompressionMethod = method.parse()?;
    let arr = extract_f64_array(py, raw_data)?;
    let data = as_slice(&arr)?;
    Ok(entropy_rate::entropy_rate_profile(data, &resolutions, method)?)
}

/// rust_dependogram — PyO3 module initializer.
///
/// Creates the `statistical_tests` submodule, attaches it to the parent,
/// and registers it in `sys.modules` under its dotted name.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn rust_dependogram<'py>(py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let statistical_tests_mod = PyModule::new(py, "statistical_tests")?;
    statistical_tests(m, &statistical_tests_mod)?;

    // Manually add the submodule into sys.modules to allow for dot notation.
    py.import("sys")?
        .getattr("modules")?
        .set_item("rust_dependogram.statistical_tests", statistical_tests_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn statistical_tests<'py>(
    parent: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<Dependogram>()?;
    m.add_function(wrap_pyfunction!(py_entropy_rate, m)?)?;
    m.add_function(wrap_pyfunction!(py_entropy_rate_profile, m)?)?;
    parent.add_submodule(m)?;
    Ok(())
}
