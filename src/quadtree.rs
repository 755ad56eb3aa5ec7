//! Point quadtree with exact nearest-neighbor queries.
//!
//! Points are stored by value in an arena; tree nodes refer to them by index.
//! Each node is empty, an occupied leaf, or an internal node owning exactly four
//! children. A leaf subdivides only when a second point at a different location
//! arrives. Every point is also recorded in a longitude-ordered
//! [`SweepIndex`], which turns the tree descent result into an exact answer.
//!
//! All geometry inside the index is planar (raw degrees).

use std::fmt;

use tracing::debug;

use crate::error::IndexError;
use crate::geometry::{Aabb, Coordinate};
use crate::sweep::{Axis, SweepIndex};

/// Subdivision stops at this depth; deeper points share a leaf.
const MAX_DEPTH: usize = 64;

/// Padding applied by [`Quadtree::from_points`] around the fitted bounds.
const DEFAULT_PADDING: f64 = 0.01;

/// A point stored in the index: an opaque identifier and its location.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndexedPoint<Id> {
    /// Identifier returned by queries, typically a graph node id.
    pub id: Id,
    /// Location of the point.
    pub coordinate: Coordinate,
}

/// Result of a nearest-neighbor query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Nearest<'a, Id> {
    /// The closest indexed point.
    pub point: &'a IndexedPoint<Id>,
    /// Planar distance from the query to `point`.
    pub distance: f64,
}

/// Shape summary of a [`Quadtree`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuadtreeStats {
    /// Number of levels below the root.
    pub depth: usize,
    /// Total number of tree nodes.
    pub node_count: usize,
    /// Number of leaves, empty or occupied.
    pub leaf_count: usize,
    /// Number of leaves holding points.
    pub occupied_leaves: usize,
}

#[derive(Clone, Debug)]
enum QuadState {
    Empty,
    /// Arena indices stored at this leaf. More than one only when the points
    /// share a coordinate or `MAX_DEPTH` was reached.
    Occupied(Vec<usize>),
    /// Children in NW, NE, SW, SE order.
    Internal(Box<[QuadNode; 4]>),
}

#[derive(Clone, Debug)]
struct QuadNode {
    boundary: Aabb,
    state: QuadState,
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    index: usize,
    distance: f64,
}

impl QuadNode {
    fn new(boundary: Aabb) -> Self {
        Self {
            boundary,
            state: QuadState::Empty,
        }
    }

    fn insert<Id>(&mut self, points: &[IndexedPoint<Id>], index: usize, depth: usize) {
        match self.state {
            QuadState::Empty => self.state = QuadState::Occupied(vec![index]),
            QuadState::Occupied(ref mut residents) => {
                let here = points[residents[0]].coordinate;
                if here == points[index].coordinate || depth >= MAX_DEPTH {
                    residents.push(index);
                    return;
                }
                let residents = std::mem::take(residents);
                let mut children = self.boundary.split().map(Self::new);
                for i in residents.into_iter().chain(std::iter::once(index)) {
                    let q = self.boundary.quadrant(&points[i].coordinate);
                    children[q.index()].insert(points, i, depth + 1);
                }
                self.state = QuadState::Internal(Box::new(children));
            }
            QuadState::Internal(ref mut children) => {
                let q = self.boundary.quadrant(&points[index].coordinate);
                children[q.index()].insert(points, index, depth + 1);
            }
        }
    }

    /// Depth-first search, preferred quadrant first, pruned by the current best.
    fn search<Id>(&self, points: &[IndexedPoint<Id>], query: &Coordinate, best: &mut Option<Candidate>) {
        if best.is_some_and(|b| !self.boundary.intersects_circle(query, b.distance)) {
            return;
        }
        match &self.state {
            QuadState::Empty => {}
            QuadState::Occupied(residents) => {
                for &i in residents {
                    let distance = query.euclidean(&points[i].coordinate);
                    if best.is_none_or(|b| distance < b.distance) {
                        *best = Some(Candidate { index: i, distance });
                    }
                }
            }
            QuadState::Internal(children) => {
                let preferred = self.boundary.quadrant(query).index();
                children[preferred].search(points, query, best);
                for (i, child) in children.iter().enumerate() {
                    if i != preferred {
                        child.search(points, query, best);
                    }
                }
            }
        }
    }

    fn collect_stats(&self, depth: usize, stats: &mut QuadtreeStats) {
        stats.node_count += 1;
        stats.depth = stats.depth.max(depth);
        match &self.state {
            QuadState::Empty => stats.leaf_count += 1,
            QuadState::Occupied(_) => {
                stats.leaf_count += 1;
                stats.occupied_leaves += 1;
            }
            QuadState::Internal(children) => {
                for child in children.iter() {
                    child.collect_stats(depth + 1, stats);
                }
            }
        }
    }

    fn fmt_tree<Id: fmt::Debug>(&self, points: &[IndexedPoint<Id>], f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            QuadState::Empty => write!(f, "empty -> {}", self.boundary),
            QuadState::Occupied(residents) => {
                for (n, &i) in residents.iter().enumerate() {
                    if n > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}@{}", points[i].id, points[i].coordinate)?;
                }
                write!(f, " -> {}", self.boundary)
            }
            QuadState::Internal(children) => {
                for (label, child) in ["NW", "NE", "SW", "SE"].iter().zip(children.iter()) {
                    write!(f, "{label} [")?;
                    child.fmt_tree(points, f)?;
                    write!(f, "] ")?;
                }
                Ok(())
            }
        }
    }
}

/// Static spatial index answering exact nearest-neighbor queries.
///
/// Build once (single writer), then query from any number of threads.
///
/// # Examples
/// ```
/// use roadmatch::{Aabb, Coordinate, Quadtree};
///
/// let points = [
///     (10, Coordinate::new(0.0, 0.0)),
///     (11, Coordinate::new(0.0, 1.0)),
///     (12, Coordinate::new(1.0, 0.0)),
///     (13, Coordinate::new(1.0, 1.0)),
/// ];
/// let bounds = Aabb::new(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0));
/// let tree = Quadtree::build(bounds, points).unwrap();
/// assert_eq!(tree.nearest_neighbor(Coordinate::new(0.4, 0.4)), Some(10));
/// ```
#[derive(Clone, Debug)]
pub struct Quadtree<Id> {
    root: QuadNode,
    points: Vec<IndexedPoint<Id>>,
    sweep: SweepIndex,
}

impl<Id> Quadtree<Id> {
    /// Creates an empty index covering `boundary`.
    pub fn new(boundary: Aabb) -> Self {
        Self {
            root: QuadNode::new(boundary),
            points: Vec::new(),
            sweep: SweepIndex::new(Axis::Longitude),
        }
    }

    /// Builds an index over `boundary` from `(id, coordinate)` pairs.
    ///
    /// # Errors
    /// [`IndexError::OutOfBounds`] for the first point outside `boundary`,
    /// [`IndexError::NonFinite`] for the first point that is not finite.
    pub fn build<I>(boundary: Aabb, points: I) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = (Id, Coordinate)>,
    {
        let mut tree = Self::new(boundary);
        for (id, coordinate) in points {
            tree.insert(id, coordinate)?;
        }
        debug!(points = tree.len(), boundary = %boundary, "quadtree built");
        Ok(tree)
    }

    /// Builds an index over bounds fitted to the points, padded by 1% per side.
    ///
    /// # Errors
    /// [`IndexError::NonFinite`] for the first point with a NaN or infinite
    /// component. No index is built in that case.
    pub fn from_points<I>(points: I) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = (Id, Coordinate)>,
    {
        Self::from_points_padded(points, DEFAULT_PADDING)
    }

    /// Like [`Quadtree::from_points`] with an explicit padding factor.
    ///
    /// # Errors
    /// [`IndexError::NonFinite`] as for [`Quadtree::from_points`].
    pub fn from_points_padded<I>(points: I, padding: f64) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = (Id, Coordinate)>,
    {
        let points: Vec<_> = points.into_iter().collect();
        if let Some(&(_, point)) = points.iter().find(|(_, c)| !c.is_finite()) {
            return Err(IndexError::NonFinite { point });
        }

        let origin = Coordinate::default();
        let boundary = Aabb::enclosing(points.iter().map(|(_, c)| *c))
            .unwrap_or_else(|| Aabb::new(origin, origin))
            .padded(padding.max(0.0));

        let mut tree = Self::new(boundary);
        for (id, coordinate) in points {
            tree.push(id, coordinate);
        }
        debug!(points = tree.len(), boundary = %boundary, "quadtree fitted to points");
        Ok(tree)
    }

    /// Inserts one point.
    ///
    /// # Errors
    /// [`IndexError::NonFinite`] if a component is NaN or infinite,
    /// [`IndexError::OutOfBounds`] if the coordinate is outside the boundary.
    /// The index is left unchanged.
    pub fn insert(&mut self, id: Id, coordinate: Coordinate) -> Result<(), IndexError> {
        if !coordinate.is_finite() {
            return Err(IndexError::NonFinite { point: coordinate });
        }
        if !self.root.boundary.contains(&coordinate) {
            return Err(IndexError::OutOfBounds {
                point: coordinate,
                boundary: self.root.boundary,
            });
        }
        self.push(id, coordinate);
        Ok(())
    }

    fn push(&mut self, id: Id, coordinate: Coordinate) {
        let index = self.points.len();
        self.points.push(IndexedPoint { id, coordinate });
        self.sweep.insert(&coordinate, index);
        self.root.insert(&self.points, index, 0);
    }

    /// The closest indexed point to `query`, or `None` if the index is empty.
    ///
    /// Among points at exactly the same distance the earliest inserted one
    /// reachable first by the descent wins.
    pub fn nearest(&self, query: Coordinate) -> Option<Nearest<'_, Id>> {
        if self.points.is_empty() || !query.is_finite() {
            return None;
        }

        let mut best = None;
        self.root.search(&self.points, &query, &mut best);
        let Candidate { index, distance } = best?;

        let (index, distance) = self
            .sweep
            .refine(&query, (index, distance), |i| query.euclidean(&self.points[i].coordinate));

        Some(Nearest {
            point: &self.points[index],
            distance,
        })
    }

    /// Boundary of the root node.
    pub fn boundary(&self) -> Aabb {
        self.root.boundary
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if no points are indexed.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Indexed points in insertion order.
    pub fn points(&self) -> &[IndexedPoint<Id>] {
        &self.points
    }

    /// Shape of the tree.
    pub fn stats(&self) -> QuadtreeStats {
        let mut stats = QuadtreeStats::default();
        self.root.collect_stats(0, &mut stats);
        stats
    }
}

impl<Id: Copy> Quadtree<Id> {
    /// Identifier of the closest indexed point, or `None` if the index is empty.
    pub fn nearest_neighbor(&self, query: Coordinate) -> Option<Id> {
        self.nearest(query).map(|n| n.point.id)
    }
}

impl<Id: fmt::Debug> fmt::Display for Quadtree<Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.fmt_tree(&self.points, f)
    }
}
