//! robust_covariance — cluster- and kernel-robust covariance estimators.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that exposes
//! the estimators to Python via the `_robust_covariance` extension module.
//! When the `python-bindings` feature is enabled, this module defines the
//! Python-facing functions and the submodules they are registered under.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`covariance` and `linalg`) as the public
//!   crate surface.
//! - Define `#[pyfunction]` wrappers and the `#[pymodule]` initializer for the
//!   `_robust_covariance` Python extension.
//! - Create and register Python submodules (`covariance`, `linalg`) under
//!   `robust_covariance` so that dot-notation imports work as expected.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner Rust modules; this file performs
//!   only FFI glue, shape checks on Python input, and error mapping.
//! - Python wrappers add exactly one check the Rust core leaves to callers:
//!   label vectors must have one entry per row of `z`. The numeric contracts
//!   (mean-zero data, positive definiteness) are passed through unchanged.
//!
//! Conventions
//! -----------
//! - Python-exposed functions live under `_robust_covariance.<submodule>` and
//!   keep the Rust names.
//! - Matrices cross the boundary as `float64` / `int64` numpy arrays; results
//!   are returned as freshly allocated numpy arrays.
//! - `CovarianceError` values become `ValueError` at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Rust users depend on the `covariance` and `linalg` modules directly and
//!   can ignore the PyO3 items guarded by the `python-bindings` feature.
//! - Both modules offer a `prelude` for one-line imports.

pub mod covariance;
pub mod linalg;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1, PyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::utils::{
    check_label_length, extract_kernel_options, extract_matrix, extract_two_way_clusters,
    extract_vector,
};

/// has_constant(x, /, x_rank=None) -> (bool, int | None)
///
/// Report whether `x` contains, or spans, a constant column and which
/// column carries it. See [`linalg::rank::has_constant`].
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "has_constant", signature = (x, x_rank = None))]
fn py_has_constant<'py>(
    x: &Bound<'py, PyAny>, x_rank: Option<usize>,
) -> PyResult<(bool, Option<usize>)> {
    let x = extract_matrix::<f64>(x)?;
    Ok(linalg::has_constant(&x, x_rank))
}

/// inv_sqrth(x) -> ndarray
///
/// Inverse symmetric square root of a positive-definite matrix.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "inv_sqrth")]
fn py_inv_sqrth<'py>(py: Python<'py>, x: &Bound<'py, PyAny>) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let x = extract_matrix::<f64>(x)?;
    Ok(linalg::inv_sqrth(&x).into_pyarray(py))
}

/// cluster_union(clusters) -> ndarray
///
/// Merge an `n×2` integer clustering into its intersection.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "cluster_union")]
fn py_cluster_union<'py>(
    py: Python<'py>, clusters: &Bound<'py, PyAny>,
) -> PyResult<Bound<'py, PyArray1<usize>>> {
    let clusters = extract_two_way_clusters(clusters)?;
    Ok(covariance::cluster_union(&clusters).into_pyarray(py))
}

/// group_debias_coefficient(clusters) -> float
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "group_debias_coefficient")]
fn py_group_debias_coefficient<'py>(clusters: &Bound<'py, PyAny>) -> PyResult<f64> {
    let labels = extract_vector::<i64>(clusters)?;
    Ok(covariance::group_debias_coefficient(&labels))
}

/// cov_cluster(z, clusters) -> ndarray
///
/// One-way cluster covariance of mean-zero `z` on the `1/n` scale.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "cov_cluster")]
fn py_cov_cluster<'py>(
    py: Python<'py>, z: &Bound<'py, PyAny>, clusters: &Bound<'py, PyAny>,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let z = extract_matrix::<f64>(z)?;
    let labels = extract_vector::<i64>(clusters)?;
    check_label_length(z.nrows(), labels.len())?;
    Ok(covariance::cov_cluster(&z, &labels).into_pyarray(py))
}

/// cov_two_way_cluster(z, clusters, /, group_debias=False) -> ndarray
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "cov_two_way_cluster", signature = (z, clusters, group_debias = false))]
fn py_cov_two_way_cluster<'py>(
    py: Python<'py>, z: &Bound<'py, PyAny>, clusters: &Bound<'py, PyAny>, group_debias: bool,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let z = extract_matrix::<f64>(z)?;
    let clusters = extract_two_way_clusters(clusters)?;
    check_label_length(z.nrows(), clusters.nrows())?;
    Ok(covariance::cov_two_way_cluster(&z, &clusters, group_debias).into_pyarray(py))
}

/// cov_kernel(z, w) -> ndarray
///
/// Kernel covariance from an explicit weight sequence. Raises `ValueError`
/// when `len(w) > z.shape[0]`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "cov_kernel")]
fn py_cov_kernel<'py>(
    py: Python<'py>, z: &Bound<'py, PyAny>, w: &Bound<'py, PyAny>,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let z = extract_matrix::<f64>(z)?;
    let w = ndarray::Array1::from(extract_vector::<f64>(w)?);
    Ok(covariance::cov_kernel(&z, &w)?.into_pyarray(py))
}

/// kernel_weights(kernel, bandwidth) -> ndarray
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "kernel_weights")]
fn py_kernel_weights<'py>(
    py: Python<'py>, kernel: &str, bandwidth: usize,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let opts = extract_kernel_options(Some(kernel), Some(bandwidth), None)?;
    Ok(opts.kernel.weights(bandwidth).into_pyarray(py))
}

/// kernel_cov(z, /, kernel="bartlett", bandwidth=None, center=False) -> ndarray
///
/// Kernel covariance with the weight sequence derived from a kernel name
/// and a fixed or plug-in bandwidth.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    name = "kernel_cov",
    signature = (z, kernel = None, bandwidth = None, center = None)
)]
fn py_kernel_cov<'py>(
    py: Python<'py>, z: &Bound<'py, PyAny>, kernel: Option<&str>, bandwidth: Option<usize>,
    center: Option<bool>,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let z = extract_matrix::<f64>(z)?;
    let opts = extract_kernel_options(kernel, bandwidth, center)?;
    Ok(covariance::calculate_kernel_cov(&opts, &z)?.into_pyarray(py))
}

/// _robust_covariance — PyO3 module initializer for the Python extension.
///
/// Creates the `covariance` and `linalg` submodules, attaches them to the
/// parent module, and registers them in `sys.modules` so they are importable
/// via dotted paths from Python.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _robust_covariance<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let covariance_mod = PyModule::new(_py, "covariance")?;
    let linalg_mod = PyModule::new(_py, "linalg")?;
    covariance_module(_py, m, &covariance_mod)?;
    linalg_module(_py, m, &linalg_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?
        .getattr("modules")?
        .set_item("robust_covariance.covariance", covariance_mod)?;

    _py.import("sys")?.getattr("modules")?.set_item("robust_covariance.linalg", linalg_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn covariance_module<'py>(
    _py: Python, robust_covariance: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_cov_cluster, m)?)?;
    m.add_function(wrap_pyfunction!(py_cov_two_way_cluster, m)?)?;
    m.add_function(wrap_pyfunction!(py_cluster_union, m)?)?;
    m.add_function(wrap_pyfunction!(py_group_debias_coefficient, m)?)?;
    m.add_function(wrap_pyfunction!(py_cov_kernel, m)?)?;
    m.add_function(wrap_pyfunction!(py_kernel_cov, m)?)?;
    m.add_function(wrap_pyfunction!(py_kernel_weights, m)?)?;
    robust_covariance.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn linalg_module<'py>(
    _py: Python, robust_covariance: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_has_constant, m)?)?;
    m.add_function(wrap_pyfunction!(py_inv_sqrth, m)?)?;
    robust_covariance.add_submodule(m)?;
    Ok(())
}
