//! linalg::power — symmetric matrix powers.
//!
//! Whitening transforms in GLS-style estimators need `X^{-1/2}` for a
//! symmetric positive-definite `X`. The power is formed from the symmetric
//! eigendecomposition `X = Q Λ Qᵀ` as `Q Λ^{-1/2} Qᵀ`.
//!
//! No definiteness check is made. A zero eigenvalue produces infinities
//! and a negative one produces NaNs in the result; callers that cannot
//! guarantee positive definiteness must screen the input themselves.
use crate::linalg::convert::{from_dmatrix, to_dmatrix};
use nalgebra::DMatrix;
use ndarray::Array2;

/// Inverse symmetric square root `x^{-1/2}`.
///
/// Parameters
/// ----------
/// - `x`: `&Array2<f64>`
///   Real symmetric `k×k` matrix, positive definite by caller contract.
///
/// Returns
/// -------
/// `Array2<f64>`
///   `Q diag(1/√λ) Qᵀ`, symmetric up to rounding. Entries are non-finite
///   when some eigenvalue is not strictly positive.
///
/// Panics
/// ------
/// - If `x` is not square.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use robust_covariance::linalg::power::inv_sqrth;
/// let x = array![[4.0, 0.0], [0.0, 9.0]];
/// let r = inv_sqrth(&x);
/// assert!((r[[0, 0]] - 0.5).abs() < 1e-12);
/// assert!((r[[1, 1]] - 1.0 / 3.0).abs() < 1e-12);
/// ```
pub fn inv_sqrth(x: &Array2<f64>) -> Array2<f64> {
    let eigen = to_dmatrix(x).symmetric_eigen();
    let q = eigen.eigenvectors;
    let scale = DMatrix::from_diagonal(&eigen.eigenvalues.map(|lambda| 1.0 / lambda.sqrt()));
    from_dmatrix(&(&q * scale * q.transpose()))
}
