//! Read-only graph contract consumed by the path search, and a road graph
//! stored in a petgraph `DiGraphMap`.

use std::fmt::Debug;
use std::hash::Hash;

use petgraph::Direction;
use petgraph::graphmap::NodeTrait;
use petgraph::prelude::DiGraphMap;

use crate::error::SearchError;

/// Outgoing-edge lookup over a weighted directed graph.
///
/// Weights must be non-negative. The graph must not change while a search
/// runs; implementations are shared across worker threads by `run_many`.
pub trait Graph {
    /// Node identifier.
    type Node: Copy + Eq + Hash + Debug;

    /// Outgoing `(neighbor, weight)` pairs of `node`, in a stable order.
    ///
    /// Unknown nodes have no edges.
    fn edges(&self, node: Self::Node) -> impl Iterator<Item = (Self::Node, f64)> + '_;
}

/// A raw petgraph map is searchable as is. Its weights are not validated;
/// the search reports bad ones as [`SearchError::MalformedGraph`].
impl<N: NodeTrait + Debug> Graph for DiGraphMap<N, f64> {
    type Node = N;

    fn edges(&self, node: N) -> impl Iterator<Item = (N, f64)> + '_ {
        // Unknown nodes yield an empty neighbor list.
        self.edges_directed(node, Direction::Outgoing).map(|(_, to, w)| (to, *w))
    }
}

/// Directed road graph with validated weights.
///
/// At most one edge is kept per ordered node pair. Adding a parallel edge
/// keeps the smaller weight, which is the only one a shortest path can use.
///
/// # Examples
/// ```
/// use roadmatch::{AdjacencyGraph, Graph};
///
/// let mut g = AdjacencyGraph::new();
/// g.add_edge(1_u64, 2, 4.0).unwrap();
/// g.add_two_way_edge(2, 3, 1.5).unwrap();
/// assert_eq!(g.edges(2).collect::<Vec<_>>(), vec![(3, 1.5)]);
/// assert!(g.add_edge(3, 1, -1.0).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct AdjacencyGraph<N: Eq + Hash> {
    graph: DiGraphMap<N, f64>,
}

impl<N: NodeTrait + Debug> AdjacencyGraph<N> {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self { graph: DiGraphMap::new() }
    }

    /// Adds `node` without edges. Existing nodes are left untouched.
    pub fn add_node(&mut self, node: N) {
        let _ = self.graph.add_node(node);
    }

    /// Adds a directed edge, creating both endpoints if needed.
    ///
    /// # Errors
    /// [`SearchError::MalformedGraph`] if `weight` is negative or NaN.
    pub fn add_edge(&mut self, from: N, to: N, weight: f64) -> Result<(), SearchError<N>> {
        if weight.is_nan() || weight < 0.0 {
            return Err(SearchError::MalformedGraph { from, to, weight });
        }
        match self.graph.edge_weight_mut(from, to) {
            Some(existing) => *existing = existing.min(weight),
            None => {
                let _ = self.graph.add_edge(from, to, weight);
            }
        }
        Ok(())
    }

    /// Adds an edge in both directions with the same weight.
    ///
    /// # Errors
    /// [`SearchError::MalformedGraph`] if `weight` is negative or NaN.
    pub fn add_two_way_edge(&mut self, a: N, b: N, weight: f64) -> Result<(), SearchError<N>> {
        self.add_edge(a, b, weight)?;
        self.add_edge(b, a, weight)
    }

    /// Builds a graph from `(from, to, weight)` triples.
    ///
    /// # Errors
    /// The first invalid weight encountered.
    pub fn from_edges<I>(edges: I) -> Result<Self, SearchError<N>>
    where
        I: IntoIterator<Item = (N, N, f64)>,
    {
        let mut g = Self::new();
        for (from, to, weight) in edges {
            g.add_edge(from, to, weight)?;
        }
        Ok(g)
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of directed edges, one per connected ordered pair.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns `true` if `node` was added.
    pub fn contains_node(&self, node: &N) -> bool {
        self.graph.contains_node(*node)
    }

    /// Weight of the edge `from -> to`, if present.
    pub fn edge_weight(&self, from: N, to: N) -> Option<f64> {
        self.graph.edge_weight(from, to).copied()
    }

    /// Iterates over all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = N> + '_ {
        self.graph.nodes()
    }

    /// The underlying petgraph map, for use with petgraph's own algorithms.
    pub fn as_graphmap(&self) -> &DiGraphMap<N, f64> {
        &self.graph
    }
}

impl<N: NodeTrait + Debug> Default for AdjacencyGraph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: NodeTrait + Debug> Graph for AdjacencyGraph<N> {
    type Node = N;

    fn edges(&self, node: N) -> impl Iterator<Item = (N, f64)> + '_ {
        Graph::edges(&self.graph, node)
    }
}
