//! linalg::rank — numerical rank, least squares, and constant detection.
//!
//! Purpose
//! -------
//! Decide whether the column space of a regressor matrix contains a
//! constant vector, and if so which column carries it. Models use this to
//! decide whether an intercept is already present before adding one or
//! before demeaning.
//!
//! Key behaviors
//! -------------
//! - [`matrix_rank`]: SVD-based numerical rank with the conventional
//!   cutoff `σ_max · max(n, k) · ε`.
//! - [`lstsq`]: minimum-norm least-squares solution via the SVD
//!   pseudo-solution, tolerant of rank-deficient inputs.
//! - [`has_constant`]: three-stage detection (literal ones column,
//!   zero-range column, rank test) returning a flag and a column index.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are finite. Non-finite entries are not screened; the SVD will
//!   propagate them in whatever way it does.
//! - When `has_constant` is given a precomputed rank, that value must be
//!   the true numerical rank of `x`; it is used verbatim.
//!
//! Conventions
//! -----------
//! - Ties between several qualifying columns resolve to the lowest column
//!   index, for every stage of [`has_constant`].
//! - Variances used to pick the contributing column are population
//!   variances (divisor `n`).
use crate::linalg::{convert::to_dmatrix, tolerances::svd_tolerance};
use log::debug;
use nalgebra::DVector;
use ndarray::{Array1, Array2, ArrayView1, Axis};

/// Numerical rank of `x` from its singular values.
///
/// Singular values strictly above `σ_max · max(n, k) · ε` are counted.
/// Empty matrices (no rows or no columns) have rank 0.
///
/// # Examples
/// ```rust
/// # use ndarray::array;
/// # use robust_covariance::linalg::rank::matrix_rank;
/// let x = array![[1.0, 2.0], [2.0, 4.0], [3.0, 6.0]];
/// assert_eq!(matrix_rank(&x), 1);
/// ```
pub fn matrix_rank(x: &Array2<f64>) -> usize {
    let (nrows, ncols) = x.dim();
    if nrows == 0 || ncols == 0 {
        return 0;
    }
    let singular_values = to_dmatrix(x).singular_values();
    let tol = svd_tolerance(singular_values.max(), nrows, ncols);
    singular_values.iter().filter(|&&s| s > tol).count()
}

/// Minimum-norm least-squares solution of `x · β ≈ y`.
///
/// Parameters
/// ----------
/// - `x`: `&Array2<f64>`
///   `n×k` design matrix; may be rank deficient or wide.
/// - `y`: `&Array1<f64>`
///   Length-`n` right-hand side.
///
/// Returns
/// -------
/// `Option<Array1<f64>>`
///   Length-`k` coefficient vector. Singular values at or below the SVD
///   cutoff are dropped, which yields the minimum-norm solution among all
///   least-squares minimizers. `None` only if the decomposition did not
///   produce singular vectors.
///
/// Panics
/// ------
/// - If `y.len() != x.nrows()`.
pub fn lstsq(x: &Array2<f64>, y: &Array1<f64>) -> Option<Array1<f64>> {
    let (nrows, ncols) = x.dim();
    assert_eq!(y.len(), nrows, "lstsq: y has {} rows, x has {}", y.len(), nrows);
    if nrows == 0 || ncols == 0 {
        return Some(Array1::zeros(ncols));
    }
    let svd = to_dmatrix(x).svd(true, true);
    let tol = svd_tolerance(svd.singular_values.max(), nrows, ncols);
    let rhs = DVector::from_iterator(nrows, y.iter().copied());
    let beta = svd.solve(&rhs, tol).ok()?;
    Some(beta.iter().copied().collect())
}

/// Detect whether the column span of `x` contains a constant.
///
/// Parameters
/// ----------
/// - `x`: `&Array2<f64>`
///   `n×k` matrix to inspect.
/// - `x_rank`: `Option<usize>`
///   Rank of `x` if already known; computed with [`matrix_rank`] when
///   `None`.
///
/// Returns
/// -------
/// `(bool, Option<usize>)`
///   The flag is `true` when a constant is found either as a column or in
///   the column span. The index names the column holding (or contributing
///   most to) the constant; it is `None` exactly when the flag is `false`.
///
/// Notes
/// -----
/// Stages, first match wins:
/// 1. a column equal to 1 everywhere;
/// 2. a column with zero range that is not identically zero;
/// 3. a rank test. A constant lies in the span when appending a ones
///    column does not raise the rank and `n > k`, or when `x` itself is
///    rank deficient. The reported column maximizes `|β_j| · var(x_j)`
///    where `β` solves `x · β ≈ 1` in the least-squares sense.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use robust_covariance::linalg::rank::has_constant;
/// let x = array![[0.3, 1.0], [1.7, 1.0], [-0.2, 1.0]];
/// assert_eq!(has_constant(&x, None), (true, Some(1)));
/// ```
pub fn has_constant(x: &Array2<f64>, x_rank: Option<usize>) -> (bool, Option<usize>) {
    if let Some(loc) = first_matching_column(x, is_ones) {
        debug!("has_constant: column {loc} is a literal ones column");
        return (true, Some(loc));
    }
    if let Some(loc) = first_matching_column(x, is_nonzero_constant) {
        debug!("has_constant: column {loc} has zero range");
        return (true, Some(loc));
    }

    let (nrows, ncols) = x.dim();
    let augmented = Array2::from_shape_fn((nrows, ncols + 1), |(i, j)| {
        if j == 0 { 1.0 } else { x[[i, j - 1]] }
    });
    let aug_rank = matrix_rank(&augmented);
    let rank = x_rank.unwrap_or_else(|| matrix_rank(x));

    let spans_constant = aug_rank == rank && nrows > ncols;
    let rank_deficient = rank < nrows.min(ncols);
    debug!(
        "has_constant: rank test (rank = {rank}, augmented rank = {aug_rank}, n = {nrows}, k = {ncols})"
    );
    if !(spans_constant || rank_deficient) {
        return (false, None);
    }

    let ones = Array1::<f64>::ones(nrows);
    let loc = lstsq(x, &ones).and_then(|beta| {
        let variances = x.var_axis(Axis(0), 0.0);
        let scores: Array1<f64> = beta.mapv(f64::abs) * &variances;
        argmax(&scores)
    });
    (true, loc)
}

// ---- Helper methods ----

fn first_matching_column<F>(x: &Array2<f64>, predicate: F) -> Option<usize>
where
    F: Fn(&ArrayView1<f64>) -> bool,
{
    x.columns().into_iter().position(|col| predicate(&col))
}

fn is_ones(col: &ArrayView1<f64>) -> bool {
    col.iter().all(|&v| v == 1.0)
}

fn is_nonzero_constant(col: &ArrayView1<f64>) -> bool {
    match col.first() {
        Some(&first) => col.iter().all(|&v| v == first) && col.iter().any(|&v| v != 0.0),
        None => false,
    }
}

/// Index of the largest entry, first occurrence on ties. A NaN entry wins
/// immediately, matching the usual array `argmax` convention.
fn argmax(values: &Array1<f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (j, &v) in values.iter().enumerate() {
        if v.is_nan() {
            return Some(j);
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((j, v)),
        }
    }
    best.map(|(j, _)| j)
}
