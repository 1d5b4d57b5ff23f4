//! Trial (spec §4.4).
//!
//! One evaluation: derive a candidate permutation from the round's base,
//! build a Hilbert index, score it, package the result. A trial never fails
//! partially — any error terminates it and is reported to the caller, who
//! folds it into no-improvement accounting rather than propagating it.

use rand::Rng;

use crate::error::SearchError;
use crate::hilbert_index::HilbertIndex;
use crate::metric::ScoreMetric;
use crate::permutation::Permutation;
use crate::point::PointSet;
use crate::result::ResultRecord;
use crate::schedule::MutationSchedule;

/// Run one trial against `base`, using `rng` for the schedule's mutation.
/// `rng` is expected to be private to the calling worker thread — see
/// `search.rs` for the per-worker seeding discipline that makes this safe
/// without a shared-RNG lock.
pub fn run_trial<S, M, R>(
    points: &PointSet,
    base: &Permutation,
    iteration: usize,
    schedule: &S,
    metric: &M,
    rng: &mut R,
) -> Result<ResultRecord, SearchError>
where
    S: MutationSchedule,
    M: ScoreMetric,
    R: Rng + ?Sized,
{
    let candidate = schedule.next_permutation(base, iteration, rng)?;
    let index = HilbertIndex::build(points, &candidate);
    let scored = metric.score(index.sorted_points())?;
    Ok(ResultRecord::new(
        candidate,
        index,
        scored.estimated_cluster_count,
        scored.merge_square_distance,
    ))
}
