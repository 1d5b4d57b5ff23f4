//! Error taxonomy for the optimal index search.
//!
//! Only invalid-input conditions surface here (see spec §7 / SPEC_FULL.md §4.10).
//! Trial failures (a Hilbert build or metric computation that errors out mid-round)
//! are caught at the trial boundary, logged, and folded into no-improvement
//! accounting; they never reach a caller as a `SearchError`.

use thiserror::Error;

/// Invalid-input errors. The search never partially completes after one of
/// these: it surfaces immediately, before any index is built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// Fewer than the minimum number of points were supplied.
    #[error("need at least {minimum} points, got {actual}")]
    TooFewPoints { minimum: usize, actual: usize },

    /// `D` (dimensionality) must be strictly positive.
    #[error("dimension must be positive")]
    NonPositiveDimension,

    /// Every point in a `PointSet` must share the same dimensionality.
    #[error("point {id} has dimension {actual}, expected {expected}")]
    InconsistentDimension {
        id: usize,
        expected: usize,
        actual: usize,
    },

    /// `bitsPerDimension` must be strictly positive.
    #[error("bits per dimension must be positive")]
    NonPositiveBitsPerDimension,

    /// A permutation's scramble count `k` must satisfy `1 <= k <= D`.
    #[error("scramble count {k} out of range for dimension {dimension}")]
    InvalidScrambleCount { k: usize, dimension: usize },

    /// The ordered sequence handed to the metric had fewer than two points
    /// after any smoothing; no gap can be computed.
    #[error("cluster-count metric needs at least two points, got {actual}")]
    TooFewPointsForMetric { actual: usize },
}
