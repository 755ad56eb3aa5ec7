//! Ordered auxiliary index used to make quadtree nearest-neighbor results
//! exact.
//!
//! Entries are ordered by one coordinate axis, chosen explicitly through
//! [`Axis`]. A window scan starting at `query - radius` visits candidates in
//! axis order and can stop at the first key beyond `query + radius`, because
//! the planar distance to any point is at least its distance along one axis.

use std::collections::BTreeSet;
use std::ops::Bound;

use ordered_float::OrderedFloat;

use crate::geometry::Coordinate;

/// The coordinate component a [`SweepIndex`] is ordered by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Axis {
    /// Order by latitude.
    Latitude,
    /// Order by longitude.
    #[default]
    Longitude,
}

impl Axis {
    /// The component of `c` along this axis.
    pub fn key(self, c: &Coordinate) -> f64 {
        match self {
            Self::Latitude => c.latitude,
            Self::Longitude => c.longitude,
        }
    }
}

/// Set of arena indices ordered by one axis of their coordinate.
///
/// Entries with equal keys are ordered by arena index, i.e. insertion order.
#[derive(Clone, Debug, Default)]
pub struct SweepIndex {
    axis: Axis,
    entries: BTreeSet<(OrderedFloat<f64>, usize)>,
}

impl SweepIndex {
    /// Creates an empty index ordered by `axis`.
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            entries: BTreeSet::new(),
        }
    }

    /// The ordering axis.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Records arena slot `index` located at `coordinate`.
    pub fn insert(&mut self, coordinate: &Coordinate, index: usize) {
        let _ = self.entries.insert((OrderedFloat(self.axis.key(coordinate)), index));
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries with key `>= lower`, in ascending key order, as `(key, index)`.
    pub fn scan_from(&self, lower: f64) -> impl Iterator<Item = (f64, usize)> + '_ {
        self.entries
            .range((Bound::Included((OrderedFloat(lower), 0)), Bound::Unbounded))
            .map(|&(k, i)| (k.0, i))
    }

    /// Shrinks a nearest-neighbor candidate by scanning the window around
    /// `query`.
    ///
    /// `best` is `(index, distance)` of the current candidate; `distance_to`
    /// returns the planar distance from `query` to an arena slot. Returns the
    /// refined candidate. A point at exactly the current distance does not
    /// replace it.
    pub fn refine<F>(&self, query: &Coordinate, best: (usize, f64), mut distance_to: F) -> (usize, f64)
    where
        F: FnMut(usize) -> f64,
    {
        let center = self.axis.key(query);
        let (mut best_index, mut best_distance) = best;
        for (key, index) in self.scan_from(center - best_distance) {
            if key > center + best_distance {
                break;
            }
            let d = distance_to(index);
            if d < best_distance {
                best_index = index;
                best_distance = d;
            }
        }
        (best_index, best_distance)
    }
}
