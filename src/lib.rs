//! Parallel, iterative search for the axis permutation that minimizes
//! Hilbert-curve clustering fragmentation.
//!
//! The core algorithm lives in [`search::OptimalIndexSearch`]: seed a
//! permutation, build a [`hilbert_index::HilbertIndex`], score it with
//! [`metric::ClusterCountMetric`], then repeatedly mutate, rebuild, and
//! rescore in parallel rounds, keeping a bounded [`heap::BoundedMaxHeap`] of
//! the best permutations found and a monotonically improving best-so-far.
//!
//! Everything downstream of a [`result::ResultRecord`] — cutting the curve
//! at its `merge_square_distance` into actual cluster assignments, scoring
//! those assignments against a ground truth — lives in [`clustering`] and
//! the `demos/` binary, not in the core search.

pub mod clustering;
pub mod error;
pub mod heap;
pub mod hilbert_index;
pub mod metric;
pub mod permutation;
pub mod point;
pub mod result;
pub mod schedule;
pub mod search;
pub mod trial;

pub use error::SearchError;
pub use permutation::Permutation;
pub use point::{Point, PointSet};
pub use result::ResultRecord;
pub use search::{OptimalIndexSearch, SearchOptions, SearchOutcome, SearchReport};
