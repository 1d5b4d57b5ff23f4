//! Search Loop (spec §4.5), `SearchOptions` builder (spec §6 builder form).
//!
//! Grounded on two shapes the teacher itself never needed: the round-barrier
//! parallel-optimizer protocol of `ShortBurstsOptimizer::optimize`
//! (capture a fixed base, run N trials against it, aggregate, decide whether
//! to advance) and the `Critical`-struct-behind-a-`Mutex` discipline of
//! `ParallelSolver::maximize` for the combined insert/compare/update
//! critical section. Per-worker RNGs are seeded once per round from a
//! master seed, so the shared-random-source lock the spec describes (§5.1)
//! collapses entirely: there is nothing left to serialize once the RNG is
//! private to each worker.
//!
//! Trials themselves never touch `Critical`: each worker only computes and
//! returns its `Result`, and the round joins every worker before folding
//! their results into the pool/best-so-far in fixed worker-index order.
//! Folding in thread-completion order would make which tying permutation
//! gets installed as best-so-far depend on OS scheduling, breaking
//! determinism under a fixed seed (spec §8.4, §5 ordering guarantee (c));
//! folding in worker-index order instead, with `is_better_than`'s strict
//! `<`, always breaks a tie toward the lowest worker index.

use std::sync::Mutex;

use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::error::SearchError;
use crate::heap::BoundedMaxHeap;
use crate::hilbert_index::HilbertIndex;
use crate::metric::{ClusterCountMetric, ScoreMetric};
use crate::permutation::Permutation;
use crate::point::PointSet;
use crate::result::ResultRecord;
use crate::schedule::{CoolingSchedule, MutationSchedule};
use crate::trial::run_trial;

/// Default trials launched per round (spec §4.5, §6 builder form).
pub const DEFAULT_PARALLEL_TRIALS: usize = 4;

#[derive(Clone, Debug)]
pub struct SearchOptions {
    outlier_size: u32,
    noise_skip_by: u32,
    parallel_trials: usize,
    max_iterations: usize,
    max_iterations_without_improvement: usize,
    rng_seed: u64,
}

impl SearchOptions {
    /// Defaults match spec §4.5's table: 4 parallel trials, 10 max
    /// iterations, 3 rounds without improvement before stopping early.
    pub fn new(outlier_size: u32, noise_skip_by: u32) -> Self {
        SearchOptions {
            outlier_size,
            noise_skip_by,
            parallel_trials: DEFAULT_PARALLEL_TRIALS,
            max_iterations: 10,
            max_iterations_without_improvement: 3,
            rng_seed: 0,
        }
    }

    /// Builder form of spec §6: `(outlierSize, noiseSkipBy, maxTrials,
    /// maxIterationsWithoutImprovement)`, deriving
    /// `maxIterations = ceil(maxTrials / parallelTrials)` with
    /// `parallelTrials = 4`.
    pub fn from_budget(
        outlier_size: u32,
        noise_skip_by: u32,
        max_trials: usize,
        max_iterations_without_improvement: usize,
    ) -> Self {
        let parallel_trials = DEFAULT_PARALLEL_TRIALS;
        let max_iterations = (max_trials + parallel_trials - 1) / parallel_trials;
        SearchOptions {
            outlier_size,
            noise_skip_by,
            parallel_trials,
            max_iterations,
            max_iterations_without_improvement,
            rng_seed: 0,
        }
    }

    pub fn with_parallel_trials(mut self, parallel_trials: usize) -> Self {
        self.parallel_trials = parallel_trials.max(1);
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_max_iterations_without_improvement(mut self, max: usize) -> Self {
        self.max_iterations_without_improvement = max.max(1);
        self
    }

    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }
}

/// Shared mutable state behind the single mutex (spec §5.2): the pool and
/// best-so-far are updated together in one critical section so admissions
/// are totally ordered and best-so-far is monotonic.
struct Critical {
    best_so_far: ResultRecord,
    pool: BoundedMaxHeap<ResultRecord>,
    round_improvements: usize,
}

/// State machine labels from spec §4.5, exposed for callers that want to
/// distinguish an early stop from exhausting the iteration budget.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    Converged,
    Exhausted,
}

pub struct SearchReport {
    pub outcome: SearchOutcome,
    pub iterations_run: usize,
}

/// The Optimal Index Search (spec C5): a parallel, iterative optimizer over
/// axis permutations.
pub struct OptimalIndexSearch {
    options: SearchOptions,
}

impl OptimalIndexSearch {
    pub fn new(options: SearchOptions) -> Self {
        OptimalIndexSearch { options }
    }

    /// Convenience over `search_many` with `K = 1`.
    pub fn search(
        &self,
        points: &PointSet,
        starting_permutation: Option<Permutation>,
    ) -> Result<ResultRecord, SearchError> {
        let (mut results, _report) = self.search_many(points, 1, starting_permutation)?;
        Ok(results.remove(0))
    }

    /// Runs the full search and returns up to `k` Result Records, best first.
    pub fn search_many(
        &self,
        points: &PointSet,
        k: usize,
        starting_permutation: Option<Permutation>,
    ) -> Result<(Vec<ResultRecord>, SearchReport), SearchError> {
        if points.len() < PointSet::MINIMUM_POINTS {
            return Err(SearchError::TooFewPoints {
                minimum: PointSet::MINIMUM_POINTS,
                actual: points.len(),
            });
        }

        let metric = ClusterCountMetric::new(self.options.outlier_size, self.options.noise_skip_by);
        let schedule = CoolingSchedule;

        let initial_permutation = match starting_permutation {
            Some(p) => p,
            None => Permutation::identity(points.dimension())?,
        };
        let initial_index = HilbertIndex::build(points, &initial_permutation);
        let initial_score = metric.score(initial_index.sorted_points())?;
        let initial_record = ResultRecord::new(
            initial_permutation,
            initial_index,
            initial_score.estimated_cluster_count,
            initial_score.merge_square_distance,
        );

        info!(
            "seeded search: {} points, initial estimated_cluster_count={}",
            points.len(),
            initial_record.estimated_cluster_count
        );

        let mut pool = BoundedMaxHeap::new(k.max(1));
        pool.add_remove(initial_record.clone());

        let critical = Mutex::new(Critical {
            best_so_far: initial_record,
            pool,
            round_improvements: 0,
        });

        let mut no_improvement_streak = 0usize;
        let mut outcome = SearchOutcome::Exhausted;
        let mut iterations_run = 0usize;

        'rounds: for iteration in 0..self.options.max_iterations {
            iterations_run = iteration + 1;
            let base = {
                let mut guard = critical.lock().expect("search mutex poisoned");
                guard.round_improvements = 0;
                guard.best_so_far.permutation.clone()
            };

            // Each worker only computes its `Result` and returns it; nothing
            // touches `critical` inside the scope. `handles` preserves
            // worker order, so `results` below is ordered by worker index
            // regardless of which thread actually finished first.
            let results: Vec<Result<ResultRecord, SearchError>> = crossbeam::thread::scope(|scope| {
                let mut handles = Vec::with_capacity(self.options.parallel_trials);
                for worker in 0..self.options.parallel_trials {
                    let base = &base;
                    let metric = &metric;
                    let schedule = &schedule;
                    let points = &*points;
                    let seed = self
                        .options
                        .rng_seed
                        .wrapping_add((iteration as u64) * 1_000_003)
                        .wrapping_add(worker as u64 + 1);

                    handles.push(scope.spawn(move |_| {
                        let mut rng = SmallRng::seed_from_u64(seed);
                        run_trial(points, base, iteration, schedule, metric, &mut rng)
                    }));
                }
                handles
                    .into_iter()
                    .map(|handle| handle.join().expect("trial thread panicked"))
                    .collect()
            })
            .expect("trial scope panicked");

            // Fold strictly in worker-index order: `is_better_than` is a
            // strict `<`, so on a tie the first (lowest-index) trial to be
            // folded keeps best-so-far, independent of completion order.
            {
                let mut guard = critical.lock().expect("search mutex poisoned");
                for (worker, result) in results.into_iter().enumerate() {
                    match result {
                        Ok(record) => {
                            if record.is_better_than(&guard.best_so_far) {
                                guard.best_so_far = record.clone();
                                guard.round_improvements += 1;
                            }
                            guard.pool.add_remove(record);
                        }
                        Err(err) => {
                            warn!("trial failed in round {} (worker {}): {}", iteration, worker, err);
                        }
                    }
                }
            }

            let round_improvements = {
                let guard = critical.lock().expect("search mutex poisoned");
                guard.round_improvements
            };

            if round_improvements == 0 {
                no_improvement_streak += 1;
            } else {
                no_improvement_streak = 0;
            }
            debug!(
                "round {} done: improvements={} streak={}",
                iteration, round_improvements, no_improvement_streak
            );

            if no_improvement_streak >= self.options.max_iterations_without_improvement {
                outcome = SearchOutcome::Converged;
                break 'rounds;
            }
        }

        let mut guard = critical.into_inner().expect("search mutex poisoned");
        let mut drained = guard.pool.remove_all();
        drained.reverse(); // worst-first -> best-first
        info!(
            "search finished: outcome={:?} iterations={} best_count={}",
            outcome, iterations_run, guard.best_so_far.estimated_cluster_count
        );

        Ok((
            drained,
            SearchReport {
                outcome,
                iterations_run,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point;

    fn grid_points(n: usize) -> PointSet {
        PointSet::new(
            (0..n)
                .map(|i| Point::new(i, vec![(i as u32) % 32, ((i as u32) * 3) % 32]))
                .collect(),
            6,
        )
        .unwrap()
    }

    #[test]
    fn rejects_too_few_points() {
        let points = PointSet::new(
            (0..9).map(|i| Point::new(i, vec![i as u32, i as u32])).collect(),
            6,
        )
        .unwrap();
        let search = OptimalIndexSearch::new(SearchOptions::new(1, 1));
        let result = search.search(&points, None);
        assert_eq!(
            result.unwrap_err(),
            SearchError::TooFewPoints {
                minimum: 10,
                actual: 9
            }
        );
    }

    #[test]
    fn accepts_exactly_the_minimum() {
        let points = grid_points(10);
        let search = OptimalIndexSearch::new(
            SearchOptions::new(1, 1).with_max_iterations(2).with_parallel_trials(2),
        );
        assert!(search.search(&points, None).is_ok());
    }

    #[test]
    fn single_trial_per_round_runs_to_completion() {
        let points = grid_points(16);
        let search = OptimalIndexSearch::new(
            SearchOptions::new(1, 1).with_parallel_trials(1).with_max_iterations(3),
        );
        let result = search.search(&points, None);
        assert!(result.is_ok());
    }

    #[test]
    fn best_so_far_never_worsens_across_a_run() {
        let points = grid_points(40);
        let search = OptimalIndexSearch::new(
            SearchOptions::new(1, 2)
                .with_max_iterations(6)
                .with_parallel_trials(3)
                .with_rng_seed(99),
        );
        let (results, _report) = search.search_many(&points, 1, None).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn search_many_returns_best_first() {
        let points = grid_points(30);
        let search = OptimalIndexSearch::new(
            SearchOptions::new(1, 1).with_max_iterations(4).with_parallel_trials(2),
        );
        let (results, _report) = search.search_many(&points, 4, None).unwrap();
        assert!(results.len() <= 4);
        for pair in results.windows(2) {
            assert!(pair[0].estimated_cluster_count <= pair[1].estimated_cluster_count);
        }
    }

    #[test]
    fn from_budget_derives_max_iterations() {
        let options = SearchOptions::from_budget(1, 1, 40, 3);
        // 40 trials / 4 parallelTrials = 10 rounds.
        let points = grid_points(20);
        let search = OptimalIndexSearch::new(options);
        assert!(search.search(&points, None).is_ok());
    }

    #[test]
    fn early_stop_reports_converged() {
        let points = grid_points(12);
        let search = OptimalIndexSearch::new(
            SearchOptions::new(1, 1)
                .with_max_iterations(50)
                .with_max_iterations_without_improvement(1)
                .with_parallel_trials(1),
        );
        let (_results, report) = search.search_many(&points, 1, None).unwrap();
        assert!(report.iterations_run <= 50);
    }
}
