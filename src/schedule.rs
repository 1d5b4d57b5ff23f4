//! Mutation Schedule (spec §4.3).
//!
//! Decides, per iteration, how many axes a trial should scramble. Early
//! iterations explore broadly; later ones refine locally, floored at five
//! axes so the search never stalls at `k = 0`.

use rand::Rng;

use crate::error::SearchError;
use crate::permutation::Permutation;

/// A pure function of `(previous, D, iteration)` apart from the randomness
/// consumed inside `scramble` itself (spec §9 "Polymorphism": schedules are
/// swappable).
pub trait MutationSchedule {
    fn next_permutation<R: Rng + ?Sized>(
        &self,
        previous: &Permutation,
        iteration: usize,
        rng: &mut R,
    ) -> Result<Permutation, SearchError>;
}

/// `k = max(min(D, 5), D >> iteration)`.
#[derive(Copy, Clone, Debug, Default)]
pub struct CoolingSchedule;

impl CoolingSchedule {
    pub fn scramble_count(dimension: usize, iteration: usize) -> usize {
        let floor = dimension.min(5);
        let cooled = dimension >> iteration.min(usize::BITS as usize - 1);
        floor.max(cooled).max(1).min(dimension)
    }
}

impl MutationSchedule for CoolingSchedule {
    fn next_permutation<R: Rng + ?Sized>(
        &self,
        previous: &Permutation,
        iteration: usize,
        rng: &mut R,
    ) -> Result<Permutation, SearchError> {
        let k = Self::scramble_count(previous.dimension(), iteration);
        previous.scramble(k, rng)
    }
}
