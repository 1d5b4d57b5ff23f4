//! Hilbert Index adapter (spec §3 "Hilbert Index (opaque, provided)"; §6
//! "Hilbert primitive").
//!
//! The spec's Hilbert primitive is `buildIndex(points, permutation) ->
//! index` with `index.sortedPoints` as its only observable. The external
//! `hilbert` crate has no notion of axis permutation at all — it sorts
//! whatever coordinate vectors it is handed. So the permutation step has to
//! happen here, before delegating to `hilbert::Point::hilbert_sort`: each
//! input point's coordinates are reordered per the permutation, then wrapped
//! in a `hilbert::Point`, mirroring the teacher's own
//! `Clustered2D -> hilbert::Point` conversion.

use hilbert::Point as HilbertPoint;

use crate::permutation::Permutation;
use crate::point::PointSet;

/// A built index: the input points, reordered into Hilbert curve order under
/// a specific permutation. Deterministic given its inputs.
pub struct HilbertIndex {
    sorted_points: Vec<HilbertPoint>,
}

impl HilbertIndex {
    /// Build an index over `points` using `permutation`.
    pub fn build(points: &PointSet, permutation: &Permutation) -> Self {
        let mut hilbert_points: Vec<HilbertPoint> = points
            .points()
            .iter()
            .map(|point| HilbertPoint::new(point.id(), &point.permuted_coords(permutation)))
            .collect();
        HilbertPoint::hilbert_sort(&mut hilbert_points, points.bits_per_dimension() as usize);
        HilbertIndex {
            sorted_points: hilbert_points,
        }
    }

    /// The points in curve order — the index's only observable.
    pub fn sorted_points(&self) -> &[HilbertPoint] {
        &self.sorted_points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point;

    #[test]
    fn build_preserves_point_count() {
        let points = PointSet::new(
            (0..12)
                .map(|i| Point::new(i, vec![i as u32, (11 - i) as u32]))
                .collect(),
            8,
        )
        .unwrap();
        let permutation = Permutation::identity(2).unwrap();
        let index = HilbertIndex::build(&points, &permutation);
        assert_eq!(index.sorted_points().len(), 12);
    }

    #[test]
    fn build_is_deterministic() {
        let points = PointSet::new(
            (0..12)
                .map(|i| Point::new(i, vec![(i * 7) as u32 % 64, (i * 3) as u32 % 64]))
                .collect(),
            6,
        )
        .unwrap();
        let permutation = Permutation::identity(2).unwrap();
        let index_a = HilbertIndex::build(&points, &permutation);
        let index_b = HilbertIndex::build(&points, &permutation);
        let ids_a: Vec<usize> = index_a.sorted_points().iter().map(|p| p.get_id()).collect();
        let ids_b: Vec<usize> = index_b.sorted_points().iter().map(|p| p.get_id()).collect();
        assert_eq!(ids_a, ids_b);
    }
}
