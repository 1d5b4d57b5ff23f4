//! Result Record (spec §4.6).
//!
//! Immutable bundle of a permutation, the index built from it, and its
//! score. Orders by `estimated_cluster_count` ascending only —
//! `merge_square_distance` is carried for downstream consumers and does not
//! participate in comparison, the same asymmetric-`Ord` idiom the teacher's
//! `AdjacentPairDistance` uses (compare on a key subset, carry the rest).

use std::cmp::Ordering;
use std::sync::Arc;

use crate::hilbert_index::HilbertIndex;
use crate::permutation::Permutation;

/// `index` is `Arc`-wrapped so the same built index can be referenced by
/// both the pool and the best-so-far slot without rebuilding it: a trial
/// publishes one record, and that one record may need to live in both
/// places at once (spec §4.5 step 2c inserts into the pool *and* compares
/// against — and possibly replaces — best-so-far).
#[derive(Clone)]
pub struct ResultRecord {
    pub permutation: Permutation,
    pub index: Arc<HilbertIndex>,
    pub estimated_cluster_count: u32,
    pub merge_square_distance: u64,
}

impl ResultRecord {
    pub fn new(
        permutation: Permutation,
        index: HilbertIndex,
        estimated_cluster_count: u32,
        merge_square_distance: u64,
    ) -> Self {
        ResultRecord {
            permutation,
            index: Arc::new(index),
            estimated_cluster_count,
            merge_square_distance,
        }
    }

    /// Strict-less comparator: `self` is better than `other` iff its count
    /// is strictly lower.
    pub fn is_better_than(&self, other: &Self) -> bool {
        self.estimated_cluster_count < other.estimated_cluster_count
    }
}

impl Ord for ResultRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.estimated_cluster_count.cmp(&other.estimated_cluster_count)
    }
}

impl PartialOrd for ResultRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ResultRecord {
    fn eq(&self, other: &Self) -> bool {
        self.estimated_cluster_count == other.estimated_cluster_count
    }
}

impl Eq for ResultRecord {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::{Point, PointSet};

    fn record(count: u32) -> ResultRecord {
        let points = PointSet::new(
            (0..10).map(|i| Point::new(i, vec![i as u32, i as u32])).collect(),
            8,
        )
        .unwrap();
        let permutation = Permutation::identity(2).unwrap();
        let index = HilbertIndex::build(&points, &permutation);
        ResultRecord::new(permutation, index, count, 0)
    }

    #[test]
    fn lower_count_is_better() {
        let better = record(2);
        let worse = record(5);
        assert!(better.is_better_than(&worse));
        assert!(!worse.is_better_than(&better));
    }

    #[test]
    fn equal_counts_are_not_better_than_each_other() {
        let a = record(3);
        let b = record(3);
        assert!(!a.is_better_than(&b));
        assert!(!b.is_better_than(&a));
        assert_eq!(a.cmp(&b), std::cmp::Ordering::Equal);
    }

    #[test]
    fn ordering_matches_count() {
        let low = record(1);
        let high = record(9);
        assert!(low < high);
    }
}
