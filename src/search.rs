//! Best-first shortest-path search over a [`Graph`].
//!
//! One search loop serves both Dijkstra (the default [`ZeroHeuristic`]) and
//! A* (any consistent [`Heuristic`]). The frontier is pluggable through
//! [`QueueKind`]; both queues give the same costs, only the expansion order of
//! equal-priority nodes may differ.
//!
//! ```
//! use roadmatch::{AdjacencyGraph, PathSearch};
//!
//! let g = AdjacencyGraph::from_edges([('s', 'a', 1.0), ('a', 't', 1.0), ('s', 't', 5.0)]).unwrap();
//! let path = PathSearch::new(&g).run('s', 't').unwrap();
//! assert_eq!(path.nodes, vec!['s', 'a', 't']);
//! assert_eq!(path.cost, 2.0);
//! ```

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::config::SearchConfig;
use crate::error::{QueueError, SearchError};
use crate::fibonacci_heap::FibonacciHeap;
use crate::frontier::{BinaryFrontier, Frontier, QueueKind};
use crate::geometry::Coordinate;
use crate::graph::Graph;

/// Estimates the remaining cost from `node` to `target`.
///
/// The estimate must be non-negative and must not depend on anything but its
/// arguments. Extracted nodes are never reopened, so results are optimal only
/// for a consistent (monotone) heuristic:
///
/// - `h(u) <= w(u, v) + h(v)` for every edge `u -> v` of weight `w(u, v)`;
/// - `h(target) = 0`.
///
/// Never overestimating is not enough. An admissible but inconsistent
/// heuristic can settle a node through a worse path first, and that path is
/// returned.
pub trait Heuristic<N> {
    /// Consistent lower bound on the cost of the cheapest path `node -> target`.
    fn estimate(&self, node: N, target: N) -> f64;
}

/// Always estimates 0, turning the search into Dijkstra's algorithm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ZeroHeuristic;

impl<N> Heuristic<N> for ZeroHeuristic {
    #[inline]
    fn estimate(&self, _node: N, _target: N) -> f64 {
        0.0
    }
}

impl<N, F> Heuristic<N> for F
where
    F: Fn(N, N) -> f64,
{
    #[inline]
    fn estimate(&self, node: N, target: N) -> f64 {
        self(node, target)
    }
}

/// Great-circle distance between node coordinates, multiplied by `scale`.
///
/// The great-circle distance obeys the triangle inequality, so this heuristic
/// is consistent whenever every edge weight is at least the great-circle
/// length of that edge times `scale`. With weights in metres along the road
/// use a scale of 1. With travel times use `1 / max_speed` (metres per unit of
/// time), where `max_speed` is at least the fastest speed on any edge. A
/// missing coordinate estimates 0, which can break consistency on edges into
/// that node.
#[derive(Clone, Copy, Debug)]
pub struct GreatCircleHeuristic<'a, N> {
    coordinates: &'a HashMap<N, Coordinate>,
    scale: f64,
}

impl<'a, N: Eq + Hash> GreatCircleHeuristic<'a, N> {
    /// Estimates in metres.
    pub fn new(coordinates: &'a HashMap<N, Coordinate>) -> Self {
        Self { coordinates, scale: 1.0 }
    }

    /// Multiplies every estimate by `scale`.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }
}

impl<N: Eq + Hash> Heuristic<N> for GreatCircleHeuristic<'_, N> {
    fn estimate(&self, node: N, target: N) -> f64 {
        match (self.coordinates.get(&node), self.coordinates.get(&target)) {
            (Some(a), Some(b)) => a.haversine(b) * self.scale,
            _ => 0.0,
        }
    }
}

/// A found path: the nodes from start to target inclusive, and its cost.
#[derive(Clone, Debug, PartialEq)]
pub struct Path<N> {
    /// Start first, target last.
    pub nodes: Vec<N>,
    /// Sum of the edge weights along `nodes`.
    pub cost: f64,
}

impl<N: Copy> Path<N> {
    /// First node.
    pub fn start(&self) -> Option<N> {
        self.nodes.first().copied()
    }

    /// Last node.
    pub fn target(&self) -> Option<N> {
        self.nodes.last().copied()
    }

    /// Number of edges traversed.
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}

/// One result per target of a batch search, in target order.
pub type BatchResults<N> = Vec<Result<Path<N>, SearchError<N>>>;

#[derive(Clone, Copy, Debug)]
struct Label<N> {
    cost: f64,
    predecessor: Option<N>,
}

/// Configurable shortest-path search over a borrowed graph.
#[derive(Clone, Debug)]
pub struct PathSearch<'g, G, H = ZeroHeuristic> {
    graph: &'g G,
    heuristic: H,
    queue: QueueKind,
    timeout: Option<Duration>,
}

impl<'g, G: Graph> PathSearch<'g, G> {
    /// Dijkstra search with a Fibonacci-heap frontier and no timeout.
    pub fn new(graph: &'g G) -> Self {
        Self {
            graph,
            heuristic: ZeroHeuristic,
            queue: QueueKind::default(),
            timeout: None,
        }
    }
}

impl<'g, G, H> PathSearch<'g, G, H>
where
    G: Graph,
    H: Heuristic<G::Node>,
{
    /// Replaces the heuristic.
    pub fn with_heuristic<H2: Heuristic<G::Node>>(self, heuristic: H2) -> PathSearch<'g, G, H2> {
        PathSearch {
            graph: self.graph,
            heuristic,
            queue: self.queue,
            timeout: self.timeout,
        }
    }

    /// Selects the frontier implementation.
    pub fn with_queue(mut self, queue: QueueKind) -> Self {
        self.queue = queue;
        self
    }

    /// Aborts a search that is still running after `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Applies queue and timeout settings. `threads` is read by
    /// [`Self::run_many`] callers, not stored here.
    pub fn with_config(mut self, config: &SearchConfig) -> Self {
        self.queue = config.queue;
        self.timeout = config.timeout();
        self
    }

    /// The selected frontier implementation.
    pub fn queue(&self) -> QueueKind {
        self.queue
    }

    /// Finds a minimum-cost path from `start` to `target`.
    ///
    /// `start == target` yields the single-node path with cost 0.
    ///
    /// # Errors
    /// - [`SearchError::NotFound`] when `target` is unreachable.
    /// - [`SearchError::MalformedGraph`] when a relaxed edge has a negative or
    ///   NaN weight.
    /// - [`SearchError::DeadlineExceeded`] when the timeout elapses.
    pub fn run(&self, start: G::Node, target: G::Node) -> Result<Path<G::Node>, SearchError<G::Node>> {
        match self.queue {
            QueueKind::Fibonacci => self.run_with(FibonacciHeap::new(), start, target),
            QueueKind::Binary => self.run_with(BinaryFrontier::new(), start, target),
        }
    }

    /// Runs the search on a caller-supplied empty frontier.
    ///
    /// # Errors
    /// As [`Self::run`]; additionally [`SearchError::Queue`] if `frontier` was
    /// not empty.
    pub fn run_with<F>(&self, mut frontier: F, start: G::Node, target: G::Node) -> Result<Path<G::Node>, SearchError<G::Node>>
    where
        F: Frontier<G::Node>,
    {
        let deadline = self.timeout.map(|t| Instant::now() + t);
        let mut labels: HashMap<G::Node, Label<G::Node>> = HashMap::new();
        let _ = labels.insert(start, Label { cost: 0.0, predecessor: None });
        frontier.insert(start, self.heuristic.estimate(start, target))?;

        let mut expanded = 0_usize;
        while let Some((current, _)) = frontier.extract_min() {
            // Every queued node was labelled before it was queued.
            let Some(&Label { cost, .. }) = labels.get(&current) else {
                continue;
            };
            if current == target {
                trace!(?start, ?target, expanded, cost, "target settled");
                return Ok(Path {
                    nodes: reconstruct(&labels, target),
                    cost,
                });
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                trace!(?start, ?target, expanded, "deadline exceeded");
                return Err(SearchError::DeadlineExceeded { expanded });
            }
            expanded += 1;

            for (next, weight) in self.graph.edges(current) {
                if weight.is_nan() || weight < 0.0 {
                    return Err(SearchError::MalformedGraph {
                        from: current,
                        to: next,
                        weight,
                    });
                }
                if frontier.is_extracted(&next) {
                    continue;
                }
                let candidate = cost + weight;
                match labels.get_mut(&next) {
                    Some(label) if candidate < label.cost => {
                        label.cost = candidate;
                        label.predecessor = Some(current);
                        let priority = candidate + self.heuristic.estimate(next, target);
                        match frontier.decrease_key(next, priority) {
                            // Rounding in `candidate + estimate` can swallow a
                            // tiny improvement; the label still records it.
                            Ok(()) | Err(QueueError::KeyNotDecreased { .. }) => {}
                            Err(e) => return Err(e.into()),
                        }
                    }
                    Some(_) => {}
                    None => {
                        let _ = labels.insert(
                            next,
                            Label {
                                cost: candidate,
                                predecessor: Some(current),
                            },
                        );
                        frontier.insert(next, candidate + self.heuristic.estimate(next, target))?;
                    }
                }
            }
        }

        trace!(?start, ?target, expanded, "frontier exhausted");
        Err(SearchError::NotFound { start, target })
    }

    /// Runs one independent search from `start` to each target on a new pool
    /// of `threads` workers (0 uses rayon's default).
    ///
    /// The returned results are in the order of `targets`. Callers running
    /// many batches should build one pool and use [`Self::run_many_in`].
    ///
    /// # Errors
    /// [`SearchError::ThreadPool`] if the pool cannot be created. Per-target
    /// failures are reported in the returned vector.
    pub fn run_many(
        &self,
        start: G::Node,
        targets: &[G::Node],
        threads: usize,
    ) -> Result<BatchResults<G::Node>, SearchError<G::Node>>
    where
        G: Sync,
        G::Node: Send + Sync,
        H: Sync,
    {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
        Ok(self.run_many_in(&pool, start, targets))
    }

    /// As [`Self::run_many`], on a caller-owned pool.
    pub fn run_many_in(
        &self,
        pool: &rayon::ThreadPool,
        start: G::Node,
        targets: &[G::Node],
    ) -> BatchResults<G::Node>
    where
        G: Sync,
        G::Node: Send + Sync,
        H: Sync,
    {
        debug!(?start, targets = targets.len(), threads = pool.current_num_threads(), "running batch search");
        pool.install(|| targets.par_iter().map(|&target| self.run(start, target)).collect())
    }
}

fn reconstruct<N: Copy + Eq + Hash>(labels: &HashMap<N, Label<N>>, target: N) -> Vec<N> {
    let mut nodes = vec![target];
    let mut node = target;
    while let Some(prev) = labels.get(&node).and_then(|l| l.predecessor) {
        nodes.push(prev);
        node = prev;
    }
    nodes.reverse();
    nodes
}

/// Shortest path from `start` to `target` using a Fibonacci-heap frontier.
///
/// # Errors
/// See [`PathSearch::run`].
pub fn shortest_path<G, H>(graph: &G, start: G::Node, target: G::Node, heuristic: H) -> Result<Path<G::Node>, SearchError<G::Node>>
where
    G: Graph,
    H: Heuristic<G::Node>,
{
    PathSearch::new(graph).with_heuristic(heuristic).run(start, target)
}
