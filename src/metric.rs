//! Cluster-Count Metric (spec §4.2).
//!
//! Given a Hilbert-sorted point sequence, estimates how many clusters the
//! curve order implies and the widest within-cluster gap. The merge-threshold
//! statistic (step 2 of the spec's algorithm) is deliberately the teacher's
//! `SingleLinkage::find_by_sorting` heuristic: sort the consecutive-pair gap
//! distances, look for where a `noise_skip_by`-smoothed growth curve jumps
//! the hardest, conservatively biased towards the high end of the range so
//! that the search prefers under-merging to over-merging.

use hilbert::Point as HilbertPoint;

use crate::error::SearchError;

/// Square distance between two curve-consecutive points, tagged with their
/// position in curve order. Mirrors the teacher's `AdjacentPairDistance`,
/// renamed and ordered the same way: primarily by distance, with position as
/// a stable tiebreaker.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Gap {
    square_distance: u64,
    position: usize,
}

impl Gap {
    fn all_pairs(points: &[HilbertPoint]) -> Vec<Gap> {
        points
            .windows(2)
            .enumerate()
            .map(|(position, pair)| Gap {
                square_distance: pair[0].square_distance(&pair[1]),
                position,
            })
            .collect()
    }
}

impl Ord for Gap {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.square_distance, self.position).cmp(&(other.square_distance, other.position))
    }
}

impl PartialOrd for Gap {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Accumulates, while scanning gaps in ascending order, the index where the
/// value grows fastest in absolute terms and the index where it grows
/// fastest in relative (ratio) terms. Ported from the teacher's
/// `DistanceGrowthStats`, unchanged in behavior.
#[derive(Default)]
struct GrowthStats {
    index_of_max_increase: usize,
    index_of_max_ratio: usize,
    index_of_max_increase_and_ratio: usize,
    max_increase: u64,
    max_ratio: f64,
}

impl GrowthStats {
    fn accumulate(&mut self, index: usize, previous: u64, current: u64) {
        if previous == 0 {
            return;
        }
        let delta = current - previous;
        let ratio = current as f64 / previous as f64;
        let mut both_high = true;
        if delta > self.max_increase {
            self.max_increase = delta;
            self.index_of_max_increase = index;
        } else {
            both_high = false;
        }
        if ratio > self.max_ratio {
            self.max_ratio = ratio;
            self.index_of_max_ratio = index;
        } else {
            both_high = false;
        }
        if both_high {
            self.index_of_max_increase_and_ratio = index;
        }
    }

    /// Pick the index of steepest growth, conservatively: prefer the index
    /// where both measures agree, fall back to whichever measure is still
    /// within the upper three-quarters of the search range.
    fn index_of_max_change(&self, low: usize, high: usize) -> usize {
        let conservative = low + (high - low) * 3 / 4;
        if self.index_of_max_increase_and_ratio > high {
            high
        } else if self.index_of_max_increase_and_ratio > conservative {
            self.index_of_max_increase_and_ratio
        } else if self.index_of_max_ratio < conservative {
            self.index_of_max_increase.clamp(low, high)
        } else if self.index_of_max_increase < conservative {
            self.index_of_max_ratio.clamp(low, high)
        } else {
            self.index_of_max_increase.min(self.index_of_max_ratio)
        }
    }
}

/// Output of scoring a curve-ordered point sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MetricResult {
    pub estimated_cluster_count: u32,
    pub merge_square_distance: u64,
}

/// A pluggable scorer over a Hilbert-sorted point sequence (spec §9
/// "Polymorphism": the metric is a seam an implementation may swap).
pub trait ScoreMetric {
    fn score(&self, sorted_points: &[HilbertPoint]) -> Result<MetricResult, SearchError>;
}

/// The cluster-count metric described in spec §4.2, configured with
/// `outlierSize` and `noiseSkipBy`.
#[derive(Copy, Clone, Debug)]
pub struct ClusterCountMetric {
    outlier_size: u32,
    noise_skip_by: u32,
}

impl ClusterCountMetric {
    pub fn new(outlier_size: u32, noise_skip_by: u32) -> Self {
        ClusterCountMetric {
            outlier_size,
            noise_skip_by,
        }
    }

    /// Derive the merge threshold `T` from the sorted gap distribution,
    /// smoothed by `noise_skip_by`. Ported from the teacher's
    /// `find_by_sorting`.
    ///
    /// Fails if the smoothing window collapses to nothing — e.g. a small
    /// point count combined with a large `noise_skip_by` can push
    /// `start_index` at or past `high_index`, leaving no gap to pick a
    /// threshold from. That is the "fewer than two points after smoothing"
    /// case spec §7 calls out; it surfaces as an invalid-input error rather
    /// than an out-of-bounds index.
    fn merge_threshold(&self, gaps: &[Gap]) -> Result<u64, SearchError> {
        let mut sorted = gaps.to_vec();
        sorted.sort();

        let skip = self.noise_skip_by as usize;
        // Mirrors the teacher's conservative window: start past the noise
        // skip, stop short enough to leave room for a minimum cluster count.
        let minimum_cluster_count = ((sorted.len() as f64).sqrt() / 2.0).max(1.0) as usize;
        let start_index = 1 + skip;
        let high_index = sorted.len().saturating_sub(minimum_cluster_count).max(start_index + 1);
        let high_index = high_index.min(sorted.len() - 1);

        if start_index >= high_index {
            return Err(SearchError::TooFewPointsForMetric {
                actual: high_index.saturating_sub(start_index),
            });
        }

        let mut stats = GrowthStats::default();
        let mut i = start_index;
        while i < high_index {
            let previous_index = i - 1 - skip;
            stats.accumulate(i, sorted[previous_index].square_distance, sorted[i].square_distance);
            i += 1;
        }

        let index_to_use = stats.index_of_max_change(start_index, high_index);
        Ok(sorted[index_to_use].square_distance)
    }
}

impl ScoreMetric for ClusterCountMetric {
    fn score(&self, sorted_points: &[HilbertPoint]) -> Result<MetricResult, SearchError> {
        if sorted_points.len() < 2 {
            return Err(SearchError::TooFewPointsForMetric {
                actual: sorted_points.len(),
            });
        }
        let gaps = Gap::all_pairs(sorted_points);
        let threshold = self.merge_threshold(&gaps)?;

        let mut estimated_cluster_count: u32 = 0;
        let mut merge_square_distance: u64 = 0;
        let mut run_length: usize = 1;

        for gap in &gaps {
            if gap.square_distance <= threshold {
                run_length += 1;
                if gap.square_distance > merge_square_distance {
                    merge_square_distance = gap.square_distance;
                }
            } else {
                if run_length > self.outlier_size as usize {
                    estimated_cluster_count += 1;
                }
                run_length = 1;
            }
        }
        if run_length > self.outlier_size as usize {
            estimated_cluster_count += 1;
        }

        Ok(MetricResult {
            estimated_cluster_count,
            merge_square_distance,
        })
    }
}
