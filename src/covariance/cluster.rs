//! covariance::cluster — cluster-robust covariance and cluster bookkeeping.
//!
//! Purpose
//! -------
//! Build cluster-robust ("sandwich meat") covariance matrices from mean-zero
//! moment contributions, together with the label utilities that clustered
//! inference needs: merging two clustering dimensions into one and the
//! finite-sample debiasing scale.
//!
//! Key behaviors
//! -------------
//! - [`cov_cluster`]: `S = (1/n) Σ_g s_g s_gᵀ`, where `s_g` is the column
//!   sum of the rows of `z` in cluster `g`.
//! - [`cluster_union`]: intersect two clusterings so that rows share a
//!   merged label iff they share both original labels.
//! - [`group_debias_coefficient`]: `(g/(g−1))·((n−1)/n)`.
//! - [`cov_two_way_cluster`]: `V(c₀) + V(c₁) − V(c₀ ∩ c₁)`, optionally with
//!   each term debiased by its own group count.
//!
//! Invariants & assumptions
//! ------------------------
//! - `z` is `n×k` with mean-zero columns. This is not checked; the
//!   estimators only form moment sums.
//! - Label slices have length `n` and at least one element. Only the
//!   equivalence classes of labels matter, never their values or order.
//! - A single cluster makes the debiasing scale infinite (or NaN when
//!   `n = 1`). That degeneracy is returned, not reported.
//!
//! Conventions
//! -----------
//! - Grouping is sort-then-scan ([`SortedGroups`]); any `Ord` label type
//!   works, including strings and tuples.
//! - Returned covariances are on the `1/n` (asymptotic) scale.
//!
//! Testing notes
//! -------------
//! - Unit tests check symmetry, the single-cluster and singleton-cluster
//!   identities, invariance to relabeling, and the two-way decomposition
//!   in cases where the union collapses onto one of the dimensions.
use crate::covariance::grouping::SortedGroups;
use ndarray::{Array1, Array2, Axis};

/// Core one-way cluster covariance estimator.
///
/// Parameters
/// ----------
/// - `z`: `&Array2<f64>`
///   `n×k` mean-zero data (rows = observations).
/// - `clusters`: `&[L]`
///   Length-`n` cluster labels; need not be sorted or contiguous.
///
/// Returns
/// -------
/// `Array2<f64>`
///   Symmetric `k×k` matrix `(1/n) Σ_g s_g s_gᵀ`.
///
/// Panics
/// ------
/// - If `clusters.len() != z.nrows()`.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use robust_covariance::covariance::cluster::cov_cluster;
/// let z = array![[1.0], [-1.0], [2.0], [-2.0]];
/// // Cluster sums are 0 and 0, so the estimate vanishes.
/// let s = cov_cluster(&z, &[0, 0, 1, 1]);
/// assert_eq!(s[[0, 0]], 0.0);
/// ```
pub fn cov_cluster<L: Ord>(z: &Array2<f64>, clusters: &[L]) -> Array2<f64> {
    let (n, k) = z.dim();
    assert_eq!(
        clusters.len(),
        n,
        "cov_cluster: {} labels for {} observations",
        clusters.len(),
        n
    );
    let groups = SortedGroups::from_keys(clusters);

    let mut s = Array2::<f64>::zeros((k, k));
    let mut z_bar = Array1::<f64>::zeros(k);
    for rows in groups.groups() {
        z_bar.fill(0.0);
        for &row in rows {
            z_bar += &z.row(row);
        }
        let col = z_bar.view().insert_axis(Axis(1));
        s += &col.dot(&col.t());
    }
    s /= n as f64;
    s
}

/// Merge two clustering dimensions into their intersection.
///
/// Rows are sorted lexicographically by `(column 0, column 1)`; labels
/// start at 0 and increase by one each time the composite key changes
/// along that order. The result is reported in the original row order.
///
/// Parameters
/// ----------
/// - `clusters`: `&Array2<i64>`
///   `n×2` matrix, one clustering dimension per column.
///
/// Returns
/// -------
/// `Vec<usize>`
///   Length-`n` merged labels in `0..G`.
///
/// Panics
/// ------
/// - If `clusters` does not have exactly two columns.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use robust_covariance::covariance::cluster::cluster_union;
/// let c = array![[1, 0], [0, 1], [1, 0], [0, 0]];
/// assert_eq!(cluster_union(&c), vec![2, 1, 2, 0]);
/// ```
pub fn cluster_union(clusters: &Array2<i64>) -> Vec<usize> {
    assert_eq!(clusters.ncols(), 2, "cluster_union: expected 2 columns, got {}", clusters.ncols());
    let keys: Vec<(i64, i64)> = clusters.rows().into_iter().map(|row| (row[0], row[1])).collect();
    let groups = SortedGroups::from_keys(&keys);

    let mut union = vec![0; keys.len()];
    for (label, rows) in groups.groups().enumerate() {
        for &row in rows {
            union[row] = label;
        }
    }
    union
}

/// Group debiasing scale `(g/(g−1))·((n−1)/n)`.
///
/// `g` is the number of distinct labels and `n` the number of labels.
/// With a single cluster the first factor divides by zero and the result
/// is not finite; this is returned as is.
///
/// Examples
/// --------
/// ```rust
/// # use robust_covariance::covariance::cluster::group_debias_coefficient;
/// let scale = group_debias_coefficient(&[0, 0, 1, 1, 2, 2]);
/// assert!((scale - 1.25).abs() < 1e-12);
/// ```
pub fn group_debias_coefficient<L: Ord>(clusters: &[L]) -> f64 {
    let n = clusters.len() as f64;
    let ngroups = SortedGroups::from_keys(clusters).num_groups() as f64;
    (ngroups / (ngroups - 1.0)) * ((n - 1.0) / n)
}

/// Two-way cluster covariance `V(c₀) + V(c₁) − V(c₀ ∩ c₁)`.
///
/// Parameters
/// ----------
/// - `z`: `&Array2<f64>`
///   `n×k` mean-zero data.
/// - `clusters`: `&Array2<i64>`
///   `n×2` labels, one clustering dimension per column.
/// - `group_debias`: `bool`
///   When `true`, each of the three one-way terms is multiplied by the
///   [`group_debias_coefficient`] of its own labeling before combining.
///
/// Returns
/// -------
/// `Array2<f64>`
///   Symmetric `k×k` matrix. It is not guaranteed to be positive
///   semi-definite; the subtraction can push small eigenvalues negative.
pub fn cov_two_way_cluster(
    z: &Array2<f64>, clusters: &Array2<i64>, group_debias: bool,
) -> Array2<f64> {
    let first = clusters.column(0).to_vec();
    let second = clusters.column(1).to_vec();
    let union = cluster_union(clusters);

    let s0 = scaled_cov_cluster(z, &first, group_debias);
    let s1 = scaled_cov_cluster(z, &second, group_debias);
    let s01 = scaled_cov_cluster(z, &union, group_debias);
    s0 + s1 - s01
}

// ---- Helper methods ----

fn scaled_cov_cluster<L: Ord>(z: &Array2<f64>, clusters: &[L], group_debias: bool) -> Array2<f64> {
    let cov = cov_cluster(z, clusters);
    if group_debias { cov * group_debias_coefficient(clusters) } else { cov }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `cov_cluster` identities (single cluster, singleton clusters),
    //   symmetry, and invariance to label values and row order.
    // - `cluster_union` labels, ordering, and partition invariance.
    // - `group_debias_coefficient` closed form and the single-cluster
    //   degeneracy.
    // - `cov_two_way_cluster` in cases where the union collapses.
    //
    // They intentionally DO NOT cover:
    // - Positive semi-definiteness of two-way estimates, which does not
    //   hold in general.
    // -------------------------------------------------------------------------

    const TOL: f64 = 1e-12;

    fn sample_z() -> Array2<f64> {
        array![
            [0.5, -1.0, 0.25],
            [1.5, 0.5, -0.75],
            [-1.0, 2.0, 0.5],
            [0.25, -0.5, 1.0],
            [-0.75, 0.0, -1.5],
            [-0.5, -1.0, 0.5]
        ]
    }

    fn assert_matrices_close(a: &Array2<f64>, b: &Array2<f64>, tol: f64) {
        assert_eq!(a.shape(), b.shape(), "shape mismatch: {:?} vs {:?}", a.shape(), b.shape());
        for i in 0..a.nrows() {
            for j in 0..a.ncols() {
                assert_relative_eq!(a[[i, j]], b[[i, j]], epsilon = tol, max_relative = tol);
            }
        }
    }

    fn same_partition(a: &[usize], b: &[usize]) -> bool {
        a.len() == b.len()
            && (0..a.len()).all(|i| (0..a.len()).all(|j| (a[i] == a[j]) == (b[i] == b[j])))
    }

    #[test]
    // Purpose
    // -------
    // With one cluster holding every row, the estimate is the outer
    // product of the column totals divided by n.
    //
    // Given
    // -----
    // - `sample_z()` and labels all equal to 1.
    //
    // Expect
    // ------
    // - `cov_cluster == (Σz)(Σz)ᵀ / n`.
    fn cov_cluster_single_cluster_matches_outer_product_of_totals() {
        // Arrange
        let z = sample_z();
        let n = z.nrows();
        let labels = vec![1; n];

        // Act
        let s = cov_cluster(&z, &labels);

        // Assert
        let total = z.sum_axis(Axis(0)).insert_axis(Axis(1));
        let expected = total.dot(&total.t()) / n as f64;
        assert_matrices_close(&s, &expected, TOL);
    }

    #[test]
    // Purpose
    // -------
    // When every row is its own cluster the estimator collapses to the
    // heteroskedasticity-robust `zᵀz / n`.
    //
    // Given
    // -----
    // - `sample_z()` with labels 0..n.
    //
    // Expect
    // ------
    // - `cov_cluster == zᵀz / n`.
    fn cov_cluster_singleton_clusters_match_cross_product() {
        let z = sample_z();
        let n = z.nrows();
        let labels: Vec<usize> = (0..n).collect();

        let s = cov_cluster(&z, &labels);

        let expected = z.t().dot(&z) / n as f64;
        assert_matrices_close(&s, &expected, TOL);
    }

    #[test]
    // Purpose
    // -------
    // Only the partition matters: unsorted integer labels, a relabeled
    // copy, and string labels with the same partition agree.
    //
    // Given
    // -----
    // - Labels [7, 3, 7, 3, 9, 9], the same partition as [0, 1, 0, 1, 2, 2],
    //   and as ["b", "a", "b", "a", "c", "c"].
    //
    // Expect
    // ------
    // - All three estimates match a hand-built sum over the clusters.
    fn cov_cluster_depends_only_on_partition() {
        // Arrange
        let z = sample_z();
        let raw = [7, 3, 7, 3, 9, 9];
        let relabeled = [0, 1, 0, 1, 2, 2];
        let named = ["b", "a", "b", "a", "c", "c"];

        // Act
        let s_raw = cov_cluster(&z, &raw);
        let s_relabeled = cov_cluster(&z, &relabeled);
        let s_named = cov_cluster(&z, &named);

        // Assert: manual Σ_g s_g s_gᵀ / n
        let mut manual = Array2::<f64>::zeros((3, 3));
        for members in [[0usize, 2], [1, 3], [4, 5]] {
            let s_g = (&z.row(members[0]) + &z.row(members[1])).insert_axis(Axis(1));
            manual = manual + s_g.dot(&s_g.t());
        }
        manual /= 6.0;
        assert_matrices_close(&s_raw, &manual, TOL);
        assert_matrices_close(&s_relabeled, &manual, TOL);
        assert_matrices_close(&s_named, &manual, TOL);
    }

    #[test]
    // Purpose
    // -------
    // The cluster estimate is exactly symmetric.
    //
    // Given
    // -----
    // - `sample_z()` with three unbalanced clusters.
    //
    // Expect
    // ------
    // - `S[i, j] == S[j, i]` within tolerance.
    fn cov_cluster_returns_symmetric_matrix() {
        let z = sample_z();
        let s = cov_cluster(&z, &[2, 0, 2, 2, 1, 0]);
        assert_matrices_close(&s, &s.t().to_owned(), TOL);
    }

    #[test]
    // Purpose
    // -------
    // Merged labels follow the (column 0, column 1) lexicographic order
    // and are reported in the original row order.
    //
    // Given
    // -----
    // - Rows (1,0), (0,1), (1,0), (0,0), (0,1).
    //
    // Expect
    // ------
    // - Sorted keys (0,0) < (0,1) < (1,0) get labels 0, 1, 2, so the
    //   result is [2, 1, 2, 0, 1].
    fn cluster_union_labels_follow_lexicographic_order() {
        let c = array![[1, 0], [0, 1], [1, 0], [0, 0], [0, 1]];
        assert_eq!(cluster_union(&c), vec![2, 1, 2, 0, 1]);
    }

    #[test]
    // Purpose
    // -------
    // Relabeling each column through a bijection of label values leaves
    // the merged partition unchanged.
    //
    // Given
    // -----
    // - A 7×2 two-way labeling and a copy with column 0 mapped x ↦ 10 − x
    //   and column 1 mapped x ↦ 3x + 100.
    //
    // Expect
    // ------
    // - Both merged labelings induce the same partition, with 5 groups.
    fn cluster_union_partition_is_invariant_to_relabeling() {
        // Arrange
        let c = array![[0, 1], [1, 1], [0, 2], [0, 1], [2, 2], [1, 1], [2, 0]];
        let mut relabeled = c.clone();
        relabeled.column_mut(0).mapv_inplace(|x| 10 - x);
        relabeled.column_mut(1).mapv_inplace(|x| 3 * x + 100);

        // Act
        let u = cluster_union(&c);
        let u_relabeled = cluster_union(&relabeled);

        // Assert
        assert!(same_partition(&u, &u_relabeled), "{u:?} vs {u_relabeled:?}");
        assert_eq!(u.iter().max(), Some(&4));
    }

    #[test]
    // Purpose
    // -------
    // The documented closed form for three balanced clusters.
    //
    // Given
    // -----
    // - Labels [0, 0, 1, 1, 2, 2] (n = 6, g = 3).
    //
    // Expect
    // ------
    // - (3/2)·(5/6) = 1.25.
    fn group_debias_coefficient_matches_closed_form() {
        assert_relative_eq!(group_debias_coefficient(&[0, 0, 1, 1, 2, 2]), 1.25, epsilon = TOL);
        assert_relative_eq!(
            group_debias_coefficient(&["x", "y", "x", "y"]),
            (2.0 / 1.0) * (3.0 / 4.0),
            epsilon = TOL
        );
    }

    #[test]
    // Purpose
    // -------
    // A single cluster is not guarded; the scale is infinite.
    //
    // Given
    // -----
    // - Four rows with the same label.
    //
    // Expect
    // ------
    // - The coefficient is +∞.
    fn group_debias_coefficient_single_cluster_is_infinite() {
        let scale = group_debias_coefficient(&[5, 5, 5, 5]);
        assert!(scale.is_infinite() && scale > 0.0);
    }

    #[test]
    // Purpose
    // -------
    // When the second dimension repeats the first, the union equals the
    // first dimension and the two-way estimate reduces to one-way.
    //
    // Given
    // -----
    // - `sample_z()` with both columns equal to [0, 0, 1, 1, 2, 2].
    //
    // Expect
    // ------
    // - `cov_two_way_cluster == cov_cluster(c₀)` with and without debiasing.
    fn cov_two_way_cluster_reduces_to_one_way_for_identical_dimensions() {
        // Arrange
        let z = sample_z();
        let labels = [0i64, 0, 1, 1, 2, 2];
        let mut c = Array2::<i64>::zeros((6, 2));
        for (i, &l) in labels.iter().enumerate() {
            c[[i, 0]] = l;
            c[[i, 1]] = l;
        }

        // Act
        let plain = cov_two_way_cluster(&z, &c, false);
        let debiased = cov_two_way_cluster(&z, &c, true);

        // Assert
        let one_way = cov_cluster(&z, &labels);
        assert_matrices_close(&plain, &one_way, 1e-10);
        let scaled = &one_way * group_debias_coefficient(&labels);
        assert_matrices_close(&debiased, &scaled, 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // If the second dimension puts every row in its own cluster, the union
    // does too, so its term cancels the second term exactly.
    //
    // Given
    // -----
    // - Column 0 = [0, 0, 1, 1, 2, 2], column 1 = 0..6.
    //
    // Expect
    // ------
    // - Undebiased two-way estimate equals `cov_cluster(c₀)`.
    fn cov_two_way_cluster_with_unique_second_dimension_equals_first() {
        let z = sample_z();
        let c = array![[0, 0], [0, 1], [1, 2], [1, 3], [2, 4], [2, 5]];

        let two_way = cov_two_way_cluster(&z, &c, false);

        let one_way = cov_cluster(&z, &[0, 0, 1, 1, 2, 2]);
        assert_matrices_close(&two_way, &one_way, 1e-10);
    }
}
