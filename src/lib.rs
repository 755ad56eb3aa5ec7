//! # roadmatch - Map Matching and Shortest Paths for Road Networks
//!
//! A Rust library that snaps raw GPS coordinates to the nearest node of a road
//! network and computes shortest paths between nodes, as input for a
//! vehicle-routing optimizer.
//!
//! ## Features
//!
//! - **Exact Nearest Neighbor**: Point quadtree with pruned descent plus a sorted sweep refinement
//! - **Generalized Search**: One best-first loop for Dijkstra and A* with a consistent heuristic
//! - **petgraph Road Graphs**: `AdjacencyGraph` over a `DiGraphMap` with validated weights
//! - **Decrease-Key Queues**: Fibonacci heap, or a binary heap with lazy deletion
//! - **Parallel Batches**: Match many stops or route from a depot to many targets on a rayon pool
//!
//! ## Quick Start
//!
//! ```rust
//! use roadmatch::prelude::*;
//!
//! // Road nodes with their coordinates
//! let nodes = [
//!     (0_u32, Coordinate::new(0.0, 0.0)),
//!     (1, Coordinate::new(0.0, 1.0)),
//!     (2, Coordinate::new(1.0, 0.0)),
//!     (3, Coordinate::new(1.0, 1.0)),
//! ];
//! let bounds = Aabb::new(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0));
//! let index = Quadtree::build(bounds, nodes).unwrap();
//!
//! // Snap a GPS fix to the closest node
//! assert_eq!(index.nearest_neighbor(Coordinate::new(0.4, 0.4)), Some(0));
//!
//! // Route between nodes
//! let mut graph = AdjacencyGraph::new();
//! graph.add_edge(0, 1, 1.0).unwrap();
//! graph.add_edge(1, 3, 1.0).unwrap();
//! graph.add_edge(0, 3, 5.0).unwrap();
//!
//! let path = shortest_path(&graph, 0, 3, ZeroHeuristic).unwrap();
//! assert_eq!(path.nodes, vec![0, 1, 3]);
//! assert_eq!(path.cost, 2.0);
//! ```
//!
//! ## How It Works
//!
//! The quadtree subdivides a leaf only when a second point at a different
//! location arrives. A nearest-neighbor query descends into the quadrant
//! containing the query first and visits the siblings only if their box lies
//! within the best distance found so far. The candidate is then checked
//! against a longitude-sorted list of all points: only points whose longitude
//! is within the candidate distance of the query can be closer, so the scan is
//! a short window.
//!
//! The search extracts the node with the smallest `cost + estimate` and relaxes
//! its outgoing edges, inserting unseen neighbors and lowering the key of
//! queued ones. Extracted nodes are final, so an A* heuristic must be
//! consistent (`h(u) <= w(u, v) + h(v)`); never overestimating is not enough.

pub mod config;
pub mod error;
pub mod fibonacci_heap;
pub mod frontier;
pub mod geometry;
pub mod graph;
pub mod matching;
pub mod prelude;
pub mod quadtree;
pub mod search;
pub mod sweep;

pub use config::{Config, MatchingConfig, SearchConfig};
pub use error::{ConfigError, IndexError, QueueError, SearchError};
pub use fibonacci_heap::FibonacciHeap;
pub use frontier::{BinaryFrontier, Frontier, QueueKind};
pub use geometry::{Aabb, Coordinate, EARTH_RADIUS_M, Metric, Quadrant};
pub use graph::{AdjacencyGraph, Graph};
pub use matching::{MapMatcher, MatchedLocation};
pub use quadtree::{IndexedPoint, Nearest, Quadtree, QuadtreeStats};
pub use search::{BatchResults, GreatCircleHeuristic, Heuristic, Path, PathSearch, ZeroHeuristic, shortest_path};
pub use sweep::{Axis, SweepIndex};

#[cfg(test)]
mod comparison_tests;
#[cfg(test)]
mod integration_test;
