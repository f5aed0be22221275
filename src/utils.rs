//! utils — Python argument conversion for the PyO3 bindings.
//!
//! Everything here is compiled only with the `python-bindings` feature and
//! converts loosely typed Python arguments into the strongly typed inputs
//! of [`crate::statistical_tests`].

#[cfg(feature = "python-bindings")]
use std::time::Duration;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArrayMethods, PyReadonlyArray1};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::statistical_tests::{
    dependogram::DependogramOptions, entropy_rate::CompressionMethod,
};

/// Borrow a contiguous `f64` view of a numpy array, pandas Series, or sequence.
///
/// Arrays that are already contiguous `float64` are borrowed without a copy;
/// Series go through `to_numpy(copy=False)`; anything else is extracted as a
/// `Vec<f64>` and moved into a fresh numpy array.
#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Assemble [`DependogramOptions`] from Python keyword arguments.
///
/// Errors
/// ------
/// - `ValueError` for an unknown `method` name, a non-positive or
///   non-finite `timeout` (seconds), or any field rejected by
///   [`DependogramOptions::new`].
#[cfg(feature = "python-bindings")]
pub fn build_dependogram_options(
    blocksizes: Option<Vec<usize>>, nshuffles: usize, nbins: usize, method: &str,
    seed: Option<u64>, timeout: Option<f64>,
) -> PyResult<DependogramOptions> {
    let method: CompressionMethod = method.parse()?;
    let opts = DependogramOptions::new(blocksizes, nshuffles, nbins, method, seed)?;

    match timeout {
        None => Ok(opts),
        Some(secs) if secs.is_finite() && secs > 0.0 => {
            Ok(opts.with_deadline(Duration::from_secs_f64(secs)))
        }
        Some(secs) => Err(PyValueError::new_err(format!(
            "timeout must be a positive number of seconds, got {secs}"
        ))),
    }
}
