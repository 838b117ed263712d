//! covariance::grouping — sort-then-scan grouping of observations by key.
//!
//! Cluster estimators only care about which rows share a label. Rather
//! than hashing, rows are stably sorted by key and contiguous runs of equal
//! keys form the groups. This works for any key with a total order
//! (integers, strings, tuples) and gives a deterministic group order.
use std::ops::Range;

/// Rows permuted into key order, plus the boundaries of each run.
///
/// `order[starts[g]..starts[g + 1]]` lists the original row indices of
/// group `g`. `starts` always ends with `order.len()`, so it has one more
/// entry than there are groups.
#[derive(Debug, Clone, PartialEq)]
pub struct SortedGroups {
    pub order: Vec<usize>,
    pub starts: Vec<usize>,
}

impl SortedGroups {
    /// Stably sort `keys` and record where adjacent keys differ.
    pub fn from_keys<K: Ord>(keys: &[K]) -> SortedGroups {
        let mut order: Vec<usize> = (0..keys.len()).collect();
        order.sort_by(|&a, &b| keys[a].cmp(&keys[b]));

        let mut starts = Vec::new();
        for pos in 0..order.len() {
            if pos == 0 || keys[order[pos]] != keys[order[pos - 1]] {
                starts.push(pos);
            }
        }
        starts.push(order.len());
        SortedGroups { order, starts }
    }

    /// Number of distinct keys.
    pub fn num_groups(&self) -> usize {
        self.starts.len() - 1
    }

    /// Position range of group `g` within `order`.
    pub fn range(&self, g: usize) -> Range<usize> {
        self.starts[g]..self.starts[g + 1]
    }

    /// Original row indices of each group, in key order.
    pub fn groups(&self) -> impl Iterator<Item = &[usize]> + '_ {
        self.starts.windows(2).map(move |w| &self.order[w[0]..w[1]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Unsorted, non-contiguous labels are grouped into contiguous runs
    // with rows inside each run kept in their original relative order.
    //
    // Given
    // -----
    // - keys = [5, 2, 5, 9, 2].
    //
    // Expect
    // ------
    // - Three groups in key order: rows {1, 4}, {0, 2}, {3}.
    fn from_keys_groups_rows_by_key_with_stable_order() {
        // Arrange
        let keys = [5, 2, 5, 9, 2];

        // Act
        let groups = SortedGroups::from_keys(&keys);

        // Assert
        assert_eq!(groups.num_groups(), 3);
        let collected: Vec<&[usize]> = groups.groups().collect();
        let expected: Vec<&[usize]> = vec![&[1, 4][..], &[0, 2][..], &[3][..]];
        assert_eq!(collected, expected);
        assert_eq!(groups.range(1), 2..4);
    }

    #[test]
    // Purpose
    // -------
    // Tuple keys sort lexicographically, first component first.
    //
    // Given
    // -----
    // - keys = [(1, 2), (0, 9), (1, 1), (0, 9)].
    //
    // Expect
    // ------
    // - Groups (0, 9) → {1, 3}, (1, 1) → {2}, (1, 2) → {0}.
    fn from_keys_orders_tuple_keys_lexicographically() {
        let keys = [(1, 2), (0, 9), (1, 1), (0, 9)];
        let groups = SortedGroups::from_keys(&keys);
        let collected: Vec<&[usize]> = groups.groups().collect();
        let expected: Vec<&[usize]> = vec![&[1, 3][..], &[2][..], &[0][..]];
        assert_eq!(collected, expected);
    }

    #[test]
    // Purpose
    // -------
    // Empty input has no groups and a single terminal boundary.
    //
    // Given
    // -----
    // - An empty key slice.
    //
    // Expect
    // ------
    // - `num_groups() == 0`, `starts == [0]`.
    fn from_keys_empty_input_has_no_groups() {
        let keys: [i64; 0] = [];
        let groups = SortedGroups::from_keys(&keys);
        assert_eq!(groups.num_groups(), 0);
        assert_eq!(groups.starts, vec![0]);
    }
}
