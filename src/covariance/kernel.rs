//! covariance::kernel — kernel (HAC) long-run covariance.
//!
//! Purpose
//! -------
//! Build heteroskedasticity- and autocorrelation-consistent covariance
//! matrices of mean-zero moment contributions. The estimator has the form
//!
//! ```text
//! S  =  (1/n) [ Γ₀  +  ∑_{i=1}^{m−1} w_i ( Γ_i + Γ_iᵀ ) ],
//! Γ₀ = zᵀ z,
//! Γ_i = z_{i:}ᵀ z_{:n−i},
//! ```
//!
//! where `z` is the `n×k` data matrix (rows=observations) and `w` a
//! length-`m` weight sequence. `w[0]` never enters: the lag-0 term is the
//! raw cross product.
//!
//! Key behaviors
//! -------------
//! - [`cov_kernel`] is the core estimator over an explicit weight
//!   sequence. It rejects `m > n` before touching the data.
//! - [`KernelCovOptions`] packages a kernel family, an optional fixed
//!   bandwidth and an opt-in centering step; [`calculate_kernel_cov`]
//!   turns those options into a weight sequence and calls [`cov_kernel`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Columns of `z` are mean-zero unless [`KernelCovOptions::center`] is
//!   set. The core estimator never demeans.
//! - The effective bandwidth in [`calculate_kernel_cov`] is truncated to
//!   `n−1`, so the generated weight sequence always satisfies `m ≤ n`.
//! - Every lagged term is added together with its transpose, so the
//!   result is symmetric by construction.
//!
//! Conventions
//! -----------
//! - Scaling is `1/n` for every lag (no `1/(n−i)` small-sample factor).
//! - Weight sequences come from [`KernelType::weights`], i.e.
//!   `w_i = kernel.weight(i/(L+1))`.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the single-weight identity `cov_kernel(z, [1]) =
//!   zᵀz/n`, agreement with a hand-rolled lag sum, symmetry, the length
//!   contract, and the options layer (defaults, centering, truncation).
use crate::covariance::{
    errors::{CovResult, CovarianceError},
    weights::KernelType,
};
use log::debug;
use ndarray::{Array1, Array2, Axis, s};
use std::{borrow::Cow, cmp::min};

/// Core kernel covariance estimator.
///
/// Parameters
/// ----------
/// - `z`: `&Array2<f64>`
///   `n×k` mean-zero data (rows=observations).
/// - `w`: `&Array1<f64>`
///   Length-`m` kernel weights; `w[i]` multiplies the lag-`i` term for
///   `i ≥ 1`. `w[0]` is ignored.
///
/// Returns
/// -------
/// `CovResult<Array2<f64>>`
///   Symmetric `k×k` long-run covariance on the `1/n` scale.
///
/// Errors
/// ------
/// - `CovarianceError::WeightsExceedObservations`
///   When `m > n`. Raised before any arithmetic on `z`.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use robust_covariance::covariance::kernel::cov_kernel;
/// let z = array![[1.0], [-1.0], [1.0], [-1.0]];
/// // Lag-1 products are all −1: S = (4 + 0.5·2·(−3)) / 4.
/// let s = cov_kernel(&z, &array![1.0, 0.5]).unwrap();
/// assert!((s[[0, 0]] - 0.25).abs() < 1e-12);
/// ```
pub fn cov_kernel(z: &Array2<f64>, w: &Array1<f64>) -> CovResult<Array2<f64>> {
    let m = w.len();
    let n = z.nrows();
    if m > n {
        return Err(CovarianceError::WeightsExceedObservations { weights: m, nobs: n });
    }

    let mut s = z.t().dot(z);
    for lag in 1..m {
        let leading = z.slice(s![lag.., ..]);
        let lagged = z.slice(s![..n - lag, ..]);
        let op = leading.t().dot(&lagged);
        s.scaled_add(w[lag], &op);
        s.scaled_add(w[lag], &op.t());
    }
    s /= n as f64;
    Ok(s)
}

/// KernelCovOptions — configuration for kernel covariance estimation.
///
/// Fields
/// ------
/// - `kernel`: [`KernelType`]
///   Taper family used to build the weight sequence.
/// - `bandwidth`: `Option<usize>`
///   Fixed bandwidth `L`, truncated to `n−1` at compute time. `None`
///   selects a plug-in bandwidth via [`KernelType::optimal_bandwidth`].
/// - `center`: `bool`
///   Demean the columns of `z` before bandwidth selection and
///   aggregation. Off by default, leaving the mean-zero contract with the
///   caller.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelCovOptions {
    pub kernel: KernelType,
    pub bandwidth: Option<usize>,
    pub center: bool,
}

impl KernelCovOptions {
    /// Construct options from explicit settings. No validation is
    /// performed; bandwidth truncation happens in
    /// [`calculate_kernel_cov`].
    pub fn new(kernel: KernelType, bandwidth: Option<usize>, center: bool) -> KernelCovOptions {
        KernelCovOptions { kernel, bandwidth, center }
    }
}

impl Default for KernelCovOptions {
    /// Bartlett kernel, plug-in bandwidth, no centering.
    fn default() -> Self {
        Self { kernel: KernelType::Bartlett, bandwidth: None, center: false }
    }
}

/// Kernel covariance of `z` under the given options.
///
/// Resolves the bandwidth (fixed or plug-in, truncated to `n−1`), builds
/// `opts.kernel.weights(L)`, and delegates to [`cov_kernel`]. With
/// `L = 0` this is the heteroskedasticity-robust `zᵀz/n`.
///
/// Errors
/// ------
/// - Propagates [`cov_kernel`] errors. With the truncation in place this
///   only happens for a `z` with no rows, where even the single lag-0
///   weight exceeds the sample.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use robust_covariance::covariance::kernel::{KernelCovOptions, calculate_kernel_cov};
/// # use robust_covariance::covariance::weights::KernelType;
/// let z = array![[1.0, -1.0], [0.5, -0.5], [-1.5, 1.5]];
/// let opts = KernelCovOptions::new(KernelType::Bartlett, Some(1), false);
/// let s = calculate_kernel_cov(&opts, &z).unwrap();
/// assert_eq!(s.shape(), &[2, 2]);
/// ```
pub fn calculate_kernel_cov(opts: &KernelCovOptions, z: &Array2<f64>) -> CovResult<Array2<f64>> {
    let n = z.nrows();

    // Center once so bandwidth selection and aggregation see the same data.
    let data: Cow<'_, Array2<f64>> = match opts.center.then(|| z.mean_axis(Axis(0))).flatten() {
        Some(col_means) => Cow::Owned(z - &col_means),
        None => Cow::Borrowed(z),
    };

    let max_bandwidth = n.saturating_sub(1);
    let bandwidth = match opts.bandwidth {
        Some(bw) => min(bw, max_bandwidth),
        None if n > 1 => min(opts.kernel.optimal_bandwidth(data.as_ref()), max_bandwidth),
        None => 0,
    };
    debug!("calculate_kernel_cov: {:?} kernel, n = {n}, bandwidth = {bandwidth}", opts.kernel);

    cov_kernel(data.as_ref(), &opts.kernel.weights(bandwidth))
}
