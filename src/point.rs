//! Points and point sets (spec §3 "Point (input)"; SPEC_FULL.md §4.7).
//!
//! A `Point` is a plain integer coordinate vector with an id. It is distinct
//! from the `hilbert` crate's own `Point` type: ours is the crate's public,
//! permutation-agnostic representation, and is only converted into a
//! `hilbert::Point` at index-construction time, after the coordinates have
//! been reordered by a `Permutation` (see `hilbert_index.rs`).

use crate::error::SearchError;

/// A single point: an id plus a coordinate vector of non-negative integers,
/// each assumed to fit in `bits_per_dimension` bits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Point {
    id: usize,
    coords: Vec<u32>,
}

impl Point {
    /// Create a new point. `coords` is the raw, unpermuted coordinate vector.
    pub fn new(id: usize, coords: Vec<u32>) -> Self {
        Point { id, coords }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn coords(&self) -> &[u32] {
        &self.coords
    }

    pub fn dimension(&self) -> usize {
        self.coords.len()
    }

    /// Return a new coordinate vector with `coords[i]` moved to
    /// `permutation[i]`'s position, i.e. axis `i` of the result holds the
    /// value that was at axis `permutation.value_at(i)` in `self`.
    pub fn permuted_coords(&self, permutation: &crate::permutation::Permutation) -> Vec<u32> {
        (0..self.coords.len())
            .map(|axis| self.coords[permutation.value_at(axis)])
            .collect()
    }
}

/// Owns the input point set along with its shared dimensionality and bit width.
#[derive(Clone, Debug)]
pub struct PointSet {
    points: Vec<Point>,
    dimension: usize,
    bits_per_dimension: u8,
}

impl PointSet {
    /// Minimum number of points the Search Loop will accept (spec §4.5 precondition).
    pub const MINIMUM_POINTS: usize = 10;

    /// Build a `PointSet`, validating dimensionality consistency.
    ///
    /// Does *not* enforce `MINIMUM_POINTS` — that precondition belongs to the
    /// Search Loop (spec §4.5), not to point-set construction in general,
    /// since other collaborators (the metric, in isolation) only need two
    /// points.
    pub fn new(points: Vec<Point>, bits_per_dimension: u8) -> Result<Self, SearchError> {
        if bits_per_dimension == 0 {
            return Err(SearchError::NonPositiveBitsPerDimension);
        }
        let dimension = match points.first() {
            Some(p) => p.dimension(),
            None => return Err(SearchError::NonPositiveDimension),
        };
        if dimension == 0 {
            return Err(SearchError::NonPositiveDimension);
        }
        for point in &points {
            if point.dimension() != dimension {
                return Err(SearchError::InconsistentDimension {
                    id: point.id(),
                    expected: dimension,
                    actual: point.dimension(),
                });
            }
        }
        Ok(PointSet {
            points,
            dimension,
            bits_per_dimension,
        })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn bits_per_dimension(&self) -> u8 {
        self.bits_per_dimension
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(id: usize, coords: &[u32]) -> Point {
        Point::new(id, coords.to_vec())
    }

    #[test]
    fn rejects_empty_point_list() {
        let result = PointSet::new(vec![], 10);
        assert_eq!(result.unwrap_err(), SearchError::NonPositiveDimension);
    }

    #[test]
    fn rejects_zero_bits_per_dimension() {
        let points = vec![point(0, &[1, 2])];
        let result = PointSet::new(points, 0);
        assert_eq!(result.unwrap_err(), SearchError::NonPositiveBitsPerDimension);
    }

    #[test]
    fn rejects_inconsistent_dimension() {
        let points = vec![point(0, &[1, 2]), point(1, &[1, 2, 3])];
        let result = PointSet::new(points, 10);
        assert!(matches!(
            result.unwrap_err(),
            SearchError::InconsistentDimension { id: 1, expected: 2, actual: 3 }
        ));
    }

    #[test]
    fn accepts_consistent_points() {
        let points = vec![point(0, &[1, 2]), point(1, &[3, 4])];
        let set = PointSet::new(points, 10).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.dimension(), 2);
        assert_eq!(set.bits_per_dimension(), 10);
    }
}
