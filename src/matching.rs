//! Map matching: snapping raw GPS coordinates to the nearest indexed road node.

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::config::MatchingConfig;
use crate::error::IndexError;
use crate::geometry::Coordinate;
use crate::quadtree::Quadtree;

/// A coordinate resolved to a road node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchedLocation<Id> {
    /// Identifier of the matched node.
    pub id: Id,
    /// Location of the matched node.
    pub coordinate: Coordinate,
    /// Planar distance from the query, in degrees.
    pub distance: f64,
    /// Great-circle distance from the query, in metres.
    pub metres: f64,
}

/// Resolves coordinates to the nearest node of a [`Quadtree`].
///
/// # Examples
/// ```
/// use roadmatch::{Coordinate, MapMatcher, MatchingConfig, Quadtree};
///
/// let index = Quadtree::from_points([
///     ("depot", Coordinate::new(52.52, 13.40)),
///     ("stop", Coordinate::new(52.50, 13.45)),
/// ])
/// .unwrap();
/// let matcher = MapMatcher::new(index, MatchingConfig::default());
/// let m = matcher.match_location(Coordinate::new(52.501, 13.449)).unwrap();
/// assert_eq!(m.id, "stop");
/// assert!(m.metres < 200.0);
/// ```
#[derive(Clone, Debug)]
pub struct MapMatcher<Id> {
    index: Quadtree<Id>,
    config: MatchingConfig,
}

impl<Id: Clone> MapMatcher<Id> {
    /// Wraps a built index.
    pub fn new(index: Quadtree<Id>, config: MatchingConfig) -> Self {
        Self { index, config }
    }

    /// Builds an index fitted to `points`, padded by `config.padding`.
    ///
    /// # Errors
    /// [`IndexError::NonFinite`] for the first point that is not finite.
    pub fn from_points<I>(points: I, config: MatchingConfig) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = (Id, Coordinate)>,
    {
        let index = Quadtree::from_points_padded(points, config.padding)?;
        Ok(Self::new(index, config))
    }

    /// The underlying index.
    pub fn index(&self) -> &Quadtree<Id> {
        &self.index
    }

    /// The active configuration.
    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Nearest node to `coordinate`.
    ///
    /// Returns `None` if the index is empty, the coordinate is not finite, or
    /// the nearest node lies beyond `max_distance_m`.
    pub fn match_location(&self, coordinate: Coordinate) -> Option<MatchedLocation<Id>> {
        let nearest = self.index.nearest(coordinate)?;
        let metres = coordinate.haversine(&nearest.point.coordinate);
        if self.config.max_distance_m.is_some_and(|max| metres > max) {
            trace!(%coordinate, metres, "nearest node too far away");
            return None;
        }
        Some(MatchedLocation {
            id: nearest.point.id.clone(),
            coordinate: nearest.point.coordinate,
            distance: nearest.distance,
            metres,
        })
    }

    /// Matches every coordinate on a new pool of `threads` workers (0 uses
    /// rayon's default). Results are in input order.
    ///
    /// # Errors
    /// Fails only if the worker pool cannot be created.
    pub fn match_locations(
        &self,
        coordinates: &[Coordinate],
        threads: usize,
    ) -> Result<Vec<Option<MatchedLocation<Id>>>, rayon::ThreadPoolBuildError>
    where
        Id: Send + Sync,
    {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
        Ok(self.match_locations_in(&pool, coordinates))
    }

    /// As [`Self::match_locations`], on a caller-owned pool.
    pub fn match_locations_in(
        &self,
        pool: &rayon::ThreadPool,
        coordinates: &[Coordinate],
    ) -> Vec<Option<MatchedLocation<Id>>>
    where
        Id: Send + Sync,
    {
        let matches: Vec<_> =
            pool.install(|| coordinates.par_iter().map(|&c| self.match_location(c)).collect());
        debug!(
            queries = coordinates.len(),
            matched = matches.iter().filter(|m| m.is_some()).count(),
            "batch matched"
        );
        matches
    }
}
