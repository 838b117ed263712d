//! weights — taper families, weight sequences, and plug-in bandwidths.
//!
//! [`KernelType`] names the taper applied to lag-`j` autocovariances in
//! [`cov_kernel`](crate::covariance::kernel::cov_kernel). The taper is
//! evaluated at `x = j/(L+1)` for bandwidth `L`, so [`KernelType::weights`]
//! always yields `L + 1` entries with a unit lag-0 weight.
//!
//! When no bandwidth is given, [`KernelType::optimal_bandwidth`] applies
//! Andrews' AR(1) plug-in: each column of `z` is fitted as an AR(1) with
//! the `arima` crate, the per-column spectral terms are pooled into
//! `α(q)`, and `L = c·(n·α)^{1/r}` with kernel-specific `c`, `q`, `r`.
//! Fits that are near a unit root or carry no variance make the plug-in
//! fail, in which case `round(n^{1/4})` is used.
use crate::{
    covariance::errors::{CovResult, CovarianceError},
    linalg::tolerances::{GENERAL_TOL, STATIONARITY_MARGIN},
};
use arima::estimate;
use log::debug;
use ndarray::{Array1, Array2, ArrayView1};
use std::{f64::consts::PI, str::FromStr};

/// Kernel taper family.
///
/// - `IID`: lag 0 only; the heteroskedasticity-robust estimator.
/// - `Bartlett`: `1 − |x|` on `|x| ≤ 1` (Newey–West).
/// - `Parzen`: piecewise cubic on `|x| ≤ 1`.
/// - `QuadraticSpectral`: unbounded support, cut off at lag `L` when a
///   weight sequence is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelType {
    IID,
    Bartlett,
    Parzen,
    QuadraticSpectral,
}

impl KernelType {
    /// Taper value `k(x)`; symmetric in `x`.
    pub fn weight(&self, x: f64) -> f64 {
        let x = x.abs();
        match self {
            KernelType::IID => if x == 0.0 { 1.0 } else { 0.0 },
            KernelType::Bartlett => (1.0 - x).max(0.0),
            KernelType::Parzen => parzen(x),
            KernelType::QuadraticSpectral => quadratic_spectral(x),
        }
    }

    /// Weight sequence `w[0..=L]` for bandwidth `L`.
    ///
    /// Entry `k` is `weight(k/(L+1))`, so `w[0] = 1` and the sequence has
    /// length `L + 1`. It can be passed straight to `cov_kernel` whenever
    /// `L < n`.
    ///
    /// # Examples
    /// ```rust
    /// # use robust_covariance::covariance::weights::KernelType;
    /// let w = KernelType::Bartlett.weights(3);
    /// assert_eq!(w.to_vec(), vec![1.0, 0.75, 0.5, 0.25]);
    /// ```
    pub fn weights(&self, bandwidth: usize) -> Array1<f64> {
        let denom = (bandwidth + 1) as f64;
        Array1::from_shape_fn(bandwidth + 1, |lag| self.weight(lag as f64 / denom))
    }

    /// Plug-in bandwidth for this kernel on the data it will be applied to.
    ///
    /// | kernel | `q` | `c` | `L` |
    /// |---|---|---|---|
    /// | `Bartlett` | 1 | 1.1447 | `c·(n·α(1))^{1/3}` |
    /// | `Parzen` | 2 | 2.6614 | `c·(n·α(2))^{1/5}` |
    /// | `QuadraticSpectral` | 2 | 1.3221 | `c·(n·α(2))^{1/5}` |
    ///
    /// `IID` always returns 0. Any failure of the AR(1) plug-in falls back to
    /// `round(n^{1/4})`. The result is not truncated; callers clamp it to
    /// `n − 1`.
    pub fn optimal_bandwidth(&self, z: &Array2<f64>) -> usize {
        let (order, scale, root) = match self {
            KernelType::IID => return 0,
            KernelType::Bartlett => (1, 1.1447, 3.0),
            KernelType::Parzen => (2, 2.6614, 5.0),
            KernelType::QuadraticSpectral => (2, 1.3221, 5.0),
        };
        let n = z.nrows() as f64;
        match plug_in_alpha(z, order) {
            Ok(alpha) => {
                let bandwidth = (scale * (n * alpha).powf(1.0 / root)).round() as usize;
                debug!("optimal_bandwidth: {self:?} alpha({order}) = {alpha}, L = {bandwidth}");
                bandwidth
            }
            Err(err) => {
                let bandwidth = n.powf(0.25).round() as usize;
                debug!("optimal_bandwidth: plug-in failed ({err}); using L = {bandwidth}");
                bandwidth
            }
        }
    }
}

impl FromStr for KernelType {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let kernel = match name.to_ascii_lowercase().as_str() {
            "iid" => KernelType::IID,
            "bartlett" | "newey_west" | "newey-west" => KernelType::Bartlett,
            "parzen" | "gallant" => KernelType::Parzen,
            "quadratic_spectral" | "quadraticspectral" | "qs" | "andrews" => {
                KernelType::QuadraticSpectral
            }
            _ => {
                return Err(format!(
                    "invalid kernel {name:?} (expected 'iid', 'bartlett', 'parzen', or 'quadratic_spectral')"
                ));
            }
        };
        Ok(kernel)
    }
}

// ---- Taper shapes (x ≥ 0) ----

fn parzen(x: f64) -> f64 {
    if x <= 0.5 {
        1.0 - 6.0 * x.powi(2) * (1.0 - x)
    } else if x <= 1.0 {
        2.0 * (1.0 - x).powi(3)
    } else {
        0.0
    }
}

fn quadratic_spectral(x: f64) -> f64 {
    if x == 0.0 {
        return 1.0;
    }
    let u = 1.2 * PI * x;
    3.0 / u.powi(2) * (u.sin() / u - u.cos())
}

// ---- Andrews plug-in ----

/// Per-column AR(1) contribution to `α(q)`: `(numerator, denominator)`.
fn ar1_spectral_terms(column: ArrayView1<'_, f64>, order: usize) -> CovResult<(f64, f64)> {
    let series = column.to_vec();
    let coeff = estimate::fit(&series, 1, 0, 0)?;
    let (intercept, phi) = (coeff[0], coeff[1]);
    if phi.abs() >= 1.0 - STATIONARITY_MARGIN {
        return Err(CovarianceError::StationarityViolated { phi });
    }

    let resid = estimate::residuals(&series, intercept, Some(&[phi]), None)?;
    let sigma2 = resid.iter().map(|e| e * e).sum::<f64>() / (resid.len() - 1) as f64;
    let scaled = 4.0 * (phi * sigma2).powi(2);
    let numerator = match order {
        1 => scaled / ((1.0 - phi).powi(6) * (1.0 + phi).powi(2)),
        2 => scaled / (1.0 - phi).powi(8),
        ord => return Err(CovarianceError::OrderNotSupported { ord }),
    };
    let denominator = sigma2.powi(2) / (1.0 - phi * phi).powi(4);
    Ok((numerator, denominator))
}

/// Pool the AR(1) terms of every column into `α(q) = Σ num / Σ den`.
///
/// # Errors
/// - `StationarityViolated` when any column has `|φ|` within
///   `STATIONARITY_MARGIN` of one.
/// - `OrderNotSupported` for `q ∉ {1, 2}`.
/// - `DenominatorTooSmall` when the pooled denominator is below
///   `GENERAL_TOL` or NaN.
/// - `Anyhow` when `arima` cannot fit a column.
fn plug_in_alpha(z: &Array2<f64>, order: usize) -> CovResult<f64> {
    let (numerator, denominator) = z.columns().into_iter().try_fold(
        (0.0, 0.0),
        |(num, den), column| -> CovResult<(f64, f64)> {
            let (col_num, col_den) = ar1_spectral_terms(column, order)?;
            Ok((num + col_num, den + col_den))
        },
    )?;
    if !(denominator >= GENERAL_TOL) {
        return Err(CovarianceError::DenominatorTooSmall { denominator });
    }
    Ok(numerator / denominator)
}
