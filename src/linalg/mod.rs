//! linalg — dense linear-algebra diagnostics for regression inputs.
//!
//! Purpose
//! -------
//! Provide the small set of decompositions that robust-inference code needs
//! around the covariance estimators: numerical rank and least squares for
//! detecting a constant in a regressor span, and the inverse symmetric
//! square root used for whitening.
//!
//! Key behaviors
//! -------------
//! - [`has_constant`] reports whether a matrix holds, or spans, a constant
//!   column and which column carries it.
//! - [`matrix_rank`] and [`lstsq`] expose the SVD rank and minimum-norm
//!   least-squares routines that back [`has_constant`].
//! - [`inv_sqrth`] computes `X^{-1/2}` for symmetric positive-definite `X`.
//!
//! Invariants & assumptions
//! ------------------------
//! - All inputs are `ndarray` matrices of finite `f64`; decompositions run
//!   in `nalgebra` after an element-wise copy ([`convert`]).
//! - Nothing here validates definiteness or finiteness. Degenerate inputs
//!   produce degenerate numbers (infinities, NaNs), never errors.
//!
//! Conventions
//! -----------
//! - SVD cutoffs follow `σ_max · max(n, k) · ε` ([`svd_tolerance`]).
//! - Column ties always resolve to the lowest index.

pub mod convert;
pub mod power;
pub mod rank;
pub mod tolerances;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::power::inv_sqrth;
pub use self::rank::{has_constant, lstsq, matrix_rank};
pub use self::tolerances::{GENERAL_TOL, STATIONARITY_MARGIN, svd_tolerance};

pub mod prelude {
    pub use super::power::inv_sqrth;
    pub use super::rank::{has_constant, lstsq, matrix_rank};
}
