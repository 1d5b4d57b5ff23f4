//! End-to-end demo: generate synthetic Gaussian clusters, search for the
//! fragmentation-minimizing axis permutation, cut the winning curve at its
//! `merge_square_distance`, and score the resulting clustering against the
//! known ground truth with BCubed.
//!
//! This ties together everything the core search declares out of scope
//! (cluster materialization, ground-truth comparison) — none of it lives in
//! the library itself.

use std::ops::Range;

use hilbert_index_search::clustering::bcubed::BCubed;
use hilbert_index_search::clustering::Clustering;
use hilbert_index_search::{OptimalIndexSearch, Point, PointSet, SearchOptions};
use log::info;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

const BITS_PER_DIMENSION: u8 = 16;
const POINTS_PER_CLUSTER: usize = 60;
const CLUSTER_CENTERS: &[(f64, f64)] = &[
    (5_000.0, 5_000.0),
    (40_000.0, 6_000.0),
    (8_000.0, 45_000.0),
    (42_000.0, 48_000.0),
    (24_000.0, 24_000.0),
];
const CLUSTER_STD_DEV: f64 = 500.0;

/// Generate Gaussian clusters around fixed centers, returning the points
/// plus each point's ground-truth category index.
fn synthetic_clusters(seed: u64) -> (Vec<Point>, Vec<usize>) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut points = Vec::with_capacity(CLUSTER_CENTERS.len() * POINTS_PER_CLUSTER);
    let mut categories = Vec::with_capacity(points.capacity());
    let mut id = 0usize;
    for (category, &(cx, cy)) in CLUSTER_CENTERS.iter().enumerate() {
        let dist_x = Normal::new(cx, CLUSTER_STD_DEV).expect("valid normal parameters");
        let dist_y = Normal::new(cy, CLUSTER_STD_DEV).expect("valid normal parameters");
        for _ in 0..POINTS_PER_CLUSTER {
            let x = dist_x.sample(&mut rng).max(0.0) as u32;
            let y = dist_y.sample(&mut rng).max(0.0) as u32;
            points.push(Point::new(id, vec![x, y]));
            categories.push(category);
            id += 1;
        }
    }
    (points, categories)
}

/// Cut a Hilbert-curve-ordered point sequence into clusters: a run
/// continues while consecutive square distance stays within
/// `merge_square_distance`, and breaks into a new cluster otherwise.
fn materialize_clusters(
    sorted_ids: &[usize],
    sorted_gaps: &[u64],
    merge_square_distance: u64,
) -> Clustering<usize, usize, Range<usize>> {
    let mut clustering = hilbert_index_search::clustering::integer_clustering();
    let mut previous_id = sorted_ids[0];
    clustering.add_to_new_cluster(previous_id).expect("fresh id");
    for (gap, &id) in sorted_gaps.iter().zip(sorted_ids.iter().skip(1)) {
        if *gap <= merge_square_distance {
            clustering.merge(previous_id, id);
        } else {
            clustering.add_to_new_cluster(id).expect("fresh id");
        }
        previous_id = id;
    }
    clustering
}

fn gold_standard(categories: &[usize]) -> Clustering<usize, usize, Range<usize>> {
    let mut clustering = hilbert_index_search::clustering::integer_clustering();
    let mut category_to_cluster = std::collections::HashMap::new();
    for (id, &category) in categories.iter().enumerate() {
        match category_to_cluster.get(&category) {
            Some(&assigned_category) => {
                clustering.add_to_cluster(id, assigned_category).expect("existing category");
            }
            None => {
                let assigned_category = clustering.add_to_new_cluster(id).expect("fresh id");
                category_to_cluster.insert(category, assigned_category);
            }
        }
    }
    clustering
}

fn main() {
    env_logger::init();

    let (points, categories) = synthetic_clusters(1234);
    let point_set = PointSet::new(points, BITS_PER_DIMENSION).expect("valid synthetic point set");

    let options = SearchOptions::new(/* outlier_size */ 2, /* noise_skip_by */ 3)
        .with_parallel_trials(4)
        .with_max_iterations(12)
        .with_max_iterations_without_improvement(4)
        .with_rng_seed(7);
    let search = OptimalIndexSearch::new(options);

    let best = search.search(&point_set, None).expect("search should succeed");
    info!(
        "best permutation {:?}: estimated_cluster_count={} merge_square_distance={}",
        best.permutation.as_slice(),
        best.estimated_cluster_count,
        best.merge_square_distance
    );

    let sorted_ids: Vec<usize> = best.index.sorted_points().iter().map(|p| p.get_id()).collect();
    let sorted_gaps: Vec<u64> = best
        .index
        .sorted_points()
        .windows(2)
        .map(|pair| pair[0].square_distance(&pair[1]))
        .collect();

    let solution = materialize_clusters(&sorted_ids, &sorted_gaps, best.merge_square_distance);
    let gold = gold_standard(&categories);

    let bcubed = BCubed::compare(&solution, &gold, 0.5);
    println!(
        "clusters found: {} (gold: {}); BCubed similarity: {:.4}",
        solution.cluster_count(),
        gold.cluster_count(),
        bcubed.similarity()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    /// S1: on well-separated synthetic Gaussian clusters, the recovered
    /// clustering should closely match the ground truth.
    #[test]
    fn well_separated_clusters_score_highly_on_bcubed() {
        let (points, categories) = synthetic_clusters(99);
        let point_set = PointSet::new(points, BITS_PER_DIMENSION).unwrap();

        let options = SearchOptions::new(2, 3)
            .with_parallel_trials(4)
            .with_max_iterations(12)
            .with_max_iterations_without_improvement(4)
            .with_rng_seed(42);
        let search = OptimalIndexSearch::new(options);
        let best = search.search(&point_set, None).unwrap();

        let sorted_ids: Vec<usize> = best.index.sorted_points().iter().map(|p| p.get_id()).collect();
        let sorted_gaps: Vec<u64> = best
            .index
            .sorted_points()
            .windows(2)
            .map(|pair| pair[0].square_distance(&pair[1]))
            .collect();
        let solution = materialize_clusters(&sorted_ids, &sorted_gaps, best.merge_square_distance);
        let gold = gold_standard(&categories);

        let bcubed = BCubed::compare(&solution, &gold, 0.5);
        assert!(
            bcubed.similarity() >= 0.85,
            "expected high similarity on well-separated clusters, got {}",
            bcubed.similarity()
        );
    }
}
