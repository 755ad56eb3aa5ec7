//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types from the crate.
//! Users can import everything they need with:
//!
//! ```
//! use roadmatch::prelude::*;
//! ```

pub use crate::{
    Aabb, AdjacencyGraph, Coordinate, Graph, Heuristic, MapMatcher, MatchedLocation, MatchingConfig, Path,
    PathSearch, QueueKind, Quadtree, SearchConfig, SearchError, ZeroHeuristic, shortest_path,
};
