//! covariance — cluster- and kernel-robust covariance estimators.
//!
//! Purpose
//! -------
//! Compute the "meat" of sandwich covariance estimators from mean-zero
//! moment contributions `z` (typically regressors times residuals), under
//! either clustered dependence or serial dependence.
//!
//! Key behaviors
//! -------------
//! - One-way and two-way cluster estimators, [`cov_cluster`] and
//!   [`cov_two_way_cluster`], with [`cluster_union`] to intersect two
//!   clusterings and [`group_debias_coefficient`] for the finite-sample
//!   scale.
//! - The kernel estimator [`cov_kernel`] over an explicit weight sequence,
//!   plus [`KernelCovOptions`] / [`calculate_kernel_cov`] that derive the
//!   sequence from a [`KernelType`] and bandwidth.
//! - A unified error type [`CovarianceError`] with result alias
//!   [`CovResult`].
//!
//! Invariants & assumptions
//! ------------------------
//! - `z` is `n×k` with mean-zero columns; nothing here checks that.
//! - Label sequences have one entry per row of `z`.
//! - The only reported failure of the core estimators is a weight
//!   sequence longer than the sample in [`cov_kernel`]. Numeric
//!   degeneracies (a single cluster, say) flow through as non-finite
//!   values.
//!
//! Conventions
//! -----------
//! - All covariances are `k×k`, symmetric, on the `1/n` scale.
//! - Grouping is sort-then-scan over any `Ord` label type
//!   ([`grouping::SortedGroups`]).
//!
//! Downstream usage
//! ----------------
//! - Model code forms `z`, picks an estimator, and multiplies by
//!   [`group_debias_coefficient`] when a debiased cluster estimate is
//!   wanted. Two-way clustering passes an `n×2` label matrix to
//!   [`cov_two_way_cluster`].
//! - The result is sandwiched between inverse Hessians upstream; that
//!   step is not part of this crate.

pub mod cluster;
pub mod errors;
pub mod grouping;
pub mod kernel;
pub mod weights;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::cluster::{cluster_union, cov_cluster, cov_two_way_cluster, group_debias_coefficient};
pub use self::errors::{CovResult, CovarianceError};
pub use self::kernel::{KernelCovOptions, calculate_kernel_cov, cov_kernel};
pub use self::weights::KernelType;

// ---- Optional convenience prelude for downstream crates ------------------

pub mod prelude {
    pub use super::cluster::{
        cluster_union, cov_cluster, cov_two_way_cluster, group_debias_coefficient,
    };
    pub use super::errors::{CovResult, CovarianceError};
    pub use super::kernel::{KernelCovOptions, calculate_kernel_cov, cov_kernel};
    pub use super::weights::KernelType;
}
