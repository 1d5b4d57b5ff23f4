use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hilbert_index_search::point::Point;
use hilbert_index_search::{OptimalIndexSearch, PointSet, SearchOptions};

fn grid_points(n: usize) -> PointSet {
    PointSet::new(
        (0..n)
            .map(|i| Point::new(i, vec![(i as u32) % 256, ((i as u32) * 37) % 256]))
            .collect(),
        8,
    )
    .expect("valid grid point set")
}

fn run_search(points: &PointSet) {
    let options = SearchOptions::new(2, 3)
        .with_parallel_trials(4)
        .with_max_iterations(8)
        .with_max_iterations_without_improvement(3)
        .with_rng_seed(13);
    let search = OptimalIndexSearch::new(options);
    let best = search.search(black_box(points), None).expect("search should succeed");
    black_box(best.estimated_cluster_count);
}

fn criterion_benchmark(c: &mut Criterion) {
    let small = grid_points(200);
    let large = grid_points(2_000);
    c.bench_function("search 200 points", |b| b.iter(|| run_search(&small)));
    c.bench_function("search 2000 points", |b| b.iter(|| run_search(&large)));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
