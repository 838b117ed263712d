//! utils — conversion helpers for the Python bindings.
//!
//! Everything here is compiled only with the `python-bindings` feature. The
//! helpers accept numpy arrays, pandas objects (via `to_numpy`), or plain
//! nested sequences and hand back owned `ndarray` values or crate option
//! types, reporting malformed input as `ValueError`/`TypeError`.
#[cfg(feature = "python-bindings")]
use ndarray::Array2;

#[cfg(feature = "python-bindings")]
use numpy::{Element, PyReadonlyArray1, PyReadonlyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::{PyTypeError, PyValueError},
    prelude::*,
    types::PyAny,
};

#[cfg(feature = "python-bindings")]
use crate::covariance::{kernel::KernelCovOptions, weights::KernelType};

/// Extract a 2-D matrix from a numpy array, a pandas object, or a sequence
/// of equal-length sequences.
#[cfg(feature = "python-bindings")]
pub fn extract_matrix<'py, T>(raw_data: &Bound<'py, PyAny>) -> PyResult<Array2<T>>
where
    T: Element + Copy + for<'a> FromPyObject<'a>,
{
    if let Ok(arr) = raw_data.extract::<PyReadonlyArray2<T>>() {
        return Ok(arr.as_array().to_owned());
    }

    if let Ok(obj) = raw_data.call_method0("to_numpy") {
        if let Ok(arr) = obj.extract::<PyReadonlyArray2<T>>() {
            return Ok(arr.as_array().to_owned());
        }
    }

    let rows: Vec<Vec<T>> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err(
            "expected a 2-D numpy.ndarray, pandas.DataFrame, or sequence of sequences",
        )
    })?;
    let nrows = rows.len();
    let ncols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|row| row.len() != ncols) {
        return Err(PyValueError::new_err("all rows must have the same length"));
    }
    Array2::from_shape_vec((nrows, ncols), rows.concat())
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Extract a 1-D vector from a numpy array, a pandas Series, or a sequence.
#[cfg(feature = "python-bindings")]
pub fn extract_vector<'py, T>(raw_data: &Bound<'py, PyAny>) -> PyResult<Vec<T>>
where
    T: Element + Copy + for<'a> FromPyObject<'a>,
{
    if let Ok(arr) = raw_data.extract::<PyReadonlyArray1<T>>() {
        return Ok(arr.as_array().to_vec());
    }

    if let Ok(obj) = raw_data.call_method0("to_numpy") {
        if let Ok(arr) = obj.extract::<PyReadonlyArray1<T>>() {
            return Ok(arr.as_array().to_vec());
        }
    }

    raw_data.extract().map_err(|_| {
        PyTypeError::new_err("expected a 1-D numpy.ndarray, pandas.Series, or sequence")
    })
}

/// Extract an `n×2` integer label matrix for two-way clustering.
#[cfg(feature = "python-bindings")]
pub fn extract_two_way_clusters<'py>(raw_data: &Bound<'py, PyAny>) -> PyResult<Array2<i64>> {
    let clusters = extract_matrix::<i64>(raw_data)?;
    if clusters.ncols() != 2 {
        return Err(PyValueError::new_err(format!(
            "clusters must have exactly 2 columns, got {}",
            clusters.ncols()
        )));
    }
    Ok(clusters)
}

/// Build [`KernelCovOptions`] from Python keyword arguments.
#[cfg(feature = "python-bindings")]
pub fn extract_kernel_options(
    kernel: Option<&str>, bandwidth: Option<usize>, center: Option<bool>,
) -> PyResult<KernelCovOptions> {
    let kernel_type = match kernel {
        Some(name) => name.parse::<KernelType>().map_err(PyValueError::new_err)?,
        None => KernelType::Bartlett,
    };
    Ok(KernelCovOptions::new(kernel_type, bandwidth, center.unwrap_or(false)))
}

/// Reject label vectors whose length differs from the number of rows.
#[cfg(feature = "python-bindings")]
pub fn check_label_length(nobs: usize, nlabels: usize) -> PyResult<()> {
    if nobs != nlabels {
        return Err(PyValueError::new_err(format!(
            "clusters has {nlabels} entries but z has {nobs} rows"
        )));
    }
    Ok(())
}
