//! Error types for indexing, queue operations, path search and configuration.

use thiserror::Error;

use crate::geometry::{Aabb, Coordinate};

/// Errors raised while inserting points into the spatial index.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndexError {
    /// The point lies outside the index boundary.
    #[error("point {point} lies outside the index boundary {boundary}")]
    OutOfBounds {
        /// The rejected coordinate.
        point: Coordinate,
        /// The boundary of the index.
        boundary: Aabb,
    },
    /// A coordinate component is NaN or infinite.
    #[error("point {point} is not finite")]
    NonFinite {
        /// The rejected coordinate.
        point: Coordinate,
    },
}

/// Contract violations on a priority queue.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum QueueError {
    /// `insert` was called for a key that is still queued.
    #[error("key is already queued, use decrease_key instead")]
    DuplicateEntry,
    /// The key was never inserted.
    #[error("key is not in the queue")]
    UnknownEntry,
    /// The key was extracted earlier and is finalized.
    #[error("key was already extracted")]
    AlreadyExtracted,
    /// `decrease_key` was called with a cost that is not smaller.
    #[error("new cost {requested} is not smaller than current cost {current}")]
    KeyNotDecreased {
        /// Cost currently stored for the key.
        current: f64,
        /// Cost passed to `decrease_key`.
        requested: f64,
    },
    /// The cost is NaN.
    #[error("cost must not be NaN")]
    InvalidCost,
}

/// Errors returned by the shortest-path search.
///
/// Node ids are kept typed, so callers can match on the exact endpoint.
#[derive(Debug, Error)]
pub enum SearchError<N> {
    /// The target cannot be reached from the start.
    #[error("no path between {start:?} and {target:?}")]
    NotFound {
        /// Start node of the search.
        start: N,
        /// Unreachable target node.
        target: N,
    },
    /// An edge carries a negative or NaN weight.
    #[error("edge {from:?} -> {to:?} has invalid weight {weight}")]
    MalformedGraph {
        /// Edge source.
        from: N,
        /// Edge destination.
        to: N,
        /// The offending weight.
        weight: f64,
    },
    /// The configured timeout elapsed before the target was settled.
    #[error("search deadline exceeded after {expanded} expansions")]
    DeadlineExceeded {
        /// Nodes extracted before the deadline hit.
        expanded: usize,
    },
    /// The frontier rejected an operation. Indicates a bug in the search.
    #[error("queue error: {0}")]
    Queue(#[from] QueueError),
    /// The worker pool for batch searches could not be created.
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl<N> SearchError<N> {
    /// Returns `true` for the "no path exists" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors loading or validating a [`crate::Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field holds a value outside its valid range.
    #[error("invalid config: {0}")]
    Invalid(String),
}
