//! Shared numeric tolerances.
//!
//! # Provided items
//! - [`STATIONARITY_MARGIN`]: ε buffer keeping AR(1) plug-in fits strictly
//!   inside the stationary region (`|φ| < 1 − ε`).
//! - [`GENERAL_TOL`]: floor below which a plug-in denominator is treated
//!   as numerically zero.
//! - [`svd_tolerance`]: the default singular-value cutoff used by rank and
//!   least-squares routines.

/// Safety margin for strict stationarity of AR(1) plug-in fits.
///
/// The Andrews bandwidth formulas divide by powers of `(1 − φ)`; fits with
/// `|φ| ≥ 1 − STATIONARITY_MARGIN` are rejected so the plug-in never runs
/// on a near unit root.
pub const STATIONARITY_MARGIN: f64 = 1e-6;

/// Generic floor for denominators that must stay away from zero.
pub const GENERAL_TOL: f64 = 1e-12;

/// Singular-value cutoff `σ_max · max(n, k) · ε` for an `n×k` matrix.
///
/// Singular values at or below this value are treated as zero, which is
/// the conventional default for dense numerical rank and for minimum-norm
/// least-squares solutions.
///
/// # Parameters
/// - `sigma_max`: largest singular value of the matrix (0 for an empty
///   or all-zero matrix).
/// - `nrows`, `ncols`: matrix dimensions.
pub fn svd_tolerance(sigma_max: f64, nrows: usize, ncols: usize) -> f64 {
    sigma_max * (nrows.max(ncols) as f64) * f64::EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // The SVD cutoff scales with both the largest singular value and the
    // larger matrix dimension.
    //
    // Given
    // -----
    // - σ_max = 2 on a 10×3 matrix.
    //
    // Expect
    // ------
    // - Cutoff equals 2 · 10 · ε, and is zero when σ_max is zero.
    fn svd_tolerance_scales_with_sigma_and_larger_dimension() {
        assert_eq!(svd_tolerance(2.0, 10, 3), 20.0 * f64::EPSILON);
        assert_eq!(svd_tolerance(2.0, 3, 10), 20.0 * f64::EPSILON);
        assert_eq!(svd_tolerance(0.0, 10, 3), 0.0);
    }
}
