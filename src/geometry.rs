//! Coordinates, distance metrics and axis-aligned bounding boxes.
//!
//! Boxes follow a screen convention: latitude grows "downward" and longitude
//! grows "rightward", so `top_left` is the (minimum latitude, minimum longitude)
//! corner and `bottom_right` the (maximum latitude, maximum longitude) one.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A geographic position in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate from latitude and longitude.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Returns `true` if both components are finite.
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Great-circle distance in metres (haversine formula).
    ///
    /// # Examples
    /// ```
    /// use roadmatch::Coordinate;
    ///
    /// let a = Coordinate::new(0.0, 0.0);
    /// let b = Coordinate::new(1.0, 0.0);
    /// assert!((a.haversine(&b) - 111_195.0).abs() < 1.0);
    /// ```
    pub fn haversine(&self, other: &Self) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = lat2 - lat1;
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon * 0.5).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// Planar distance over the raw degree values.
    pub fn euclidean(&self, other: &Self) -> f64 {
        let dlat = self.latitude - other.latitude;
        let dlon = self.longitude - other.longitude;
        (dlat * dlat + dlon * dlon).sqrt()
    }

    /// Distance to `other` under the given metric.
    pub fn distance(&self, other: &Self, metric: Metric) -> f64 {
        metric.distance(self, other)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

/// Distance metric between two coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Haversine distance in metres.
    GreatCircle,
    /// Euclidean distance in degrees. The spatial index uses this one.
    #[default]
    Planar,
}

impl Metric {
    /// Distance between `a` and `b`.
    pub fn distance(self, a: &Coordinate, b: &Coordinate) -> f64 {
        match self {
            Self::GreatCircle => a.haversine(b),
            Self::Planar => a.euclidean(b),
        }
    }
}

/// One of the four sub-boxes produced by [`Aabb::split`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// Lower latitude, lower longitude.
    NorthWest = 0,
    /// Lower latitude, higher longitude.
    NorthEast = 1,
    /// Higher latitude, lower longitude.
    SouthWest = 2,
    /// Higher latitude, higher longitude.
    SouthEast = 3,
}

impl Quadrant {
    /// All quadrants in split order.
    pub const ALL: [Self; 4] = [Self::NorthWest, Self::NorthEast, Self::SouthWest, Self::SouthEast];

    /// Position of this quadrant in the array returned by [`Aabb::split`].
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Axis-aligned bounding box in coordinate space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    top_left: Coordinate,
    bottom_right: Coordinate,
}

impl Aabb {
    /// Creates a box from its (min lat, min lon) and (max lat, max lon) corners.
    ///
    /// Use [`Aabb::from_corners`] when the corner order is not known.
    pub const fn new(top_left: Coordinate, bottom_right: Coordinate) -> Self {
        Self { top_left, bottom_right }
    }

    /// Creates a box from any two opposite corners.
    pub fn from_corners(a: Coordinate, b: Coordinate) -> Self {
        Self {
            top_left: Coordinate::new(a.latitude.min(b.latitude), a.longitude.min(b.longitude)),
            bottom_right: Coordinate::new(a.latitude.max(b.latitude), a.longitude.max(b.longitude)),
        }
    }

    /// Smallest box containing every coordinate, or `None` for an empty set.
    pub fn enclosing<I>(coordinates: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        coordinates.into_iter().fold(None, |acc, c| {
            Some(match acc {
                None => Self::new(c, c),
                Some(b) => Self::from_corners(
                    Coordinate::new(b.top_left.latitude.min(c.latitude), b.top_left.longitude.min(c.longitude)),
                    Coordinate::new(
                        b.bottom_right.latitude.max(c.latitude),
                        b.bottom_right.longitude.max(c.longitude),
                    ),
                ),
            })
        })
    }

    /// Grows every side by `factor` times the extent along that axis.
    #[must_use]
    pub fn padded(&self, factor: f64) -> Self {
        let lat_pad = self.height() * factor;
        let lon_pad = self.width() * factor;
        Self {
            top_left: Coordinate::new(self.top_left.latitude - lat_pad, self.top_left.longitude - lon_pad),
            bottom_right: Coordinate::new(
                self.bottom_right.latitude + lat_pad,
                self.bottom_right.longitude + lon_pad,
            ),
        }
    }

    /// Minimum-latitude, minimum-longitude corner.
    pub fn top_left(&self) -> Coordinate {
        self.top_left
    }

    /// Maximum-latitude, maximum-longitude corner.
    pub fn bottom_right(&self) -> Coordinate {
        self.bottom_right
    }

    /// Extent along the longitude axis.
    pub fn width(&self) -> f64 {
        self.bottom_right.longitude - self.top_left.longitude
    }

    /// Extent along the latitude axis.
    pub fn height(&self) -> f64 {
        self.bottom_right.latitude - self.top_left.latitude
    }

    /// Center point of the box.
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            self.top_left.latitude + self.height() / 2.0,
            self.top_left.longitude + self.width() / 2.0,
        )
    }

    /// Longest side.
    pub fn max_dimension(&self) -> f64 {
        self.height().max(self.width())
    }

    /// Point containment, closed on all four edges.
    pub fn contains(&self, point: &Coordinate) -> bool {
        point.latitude >= self.top_left.latitude
            && point.latitude <= self.bottom_right.latitude
            && point.longitude >= self.top_left.longitude
            && point.longitude <= self.bottom_right.longitude
    }

    /// Planar distance from `point` to the nearest point of the box (0 inside).
    pub fn min_distance(&self, point: &Coordinate) -> f64 {
        let dlat = axis_distance(point.latitude, self.top_left.latitude, self.bottom_right.latitude);
        let dlon = axis_distance(point.longitude, self.top_left.longitude, self.bottom_right.longitude);
        (dlat * dlat + dlon * dlon).sqrt()
    }

    /// Returns `true` if the circle touches or overlaps the box.
    pub fn intersects_circle(&self, center: &Coordinate, radius: f64) -> bool {
        self.min_distance(center) <= radius
    }

    /// Quarters the box at its center, in NW, NE, SW, SE order.
    ///
    /// Children share their inner edges. A point on a shared edge is assigned
    /// by [`Aabb::quadrant`], never by trying each child in turn.
    pub fn split(&self) -> [Self; 4] {
        let c = self.center();
        let tl = self.top_left;
        let br = self.bottom_right;
        [
            Self::new(tl, c),
            Self::new(Coordinate::new(tl.latitude, c.longitude), Coordinate::new(c.latitude, br.longitude)),
            Self::new(Coordinate::new(c.latitude, tl.longitude), Coordinate::new(br.latitude, c.longitude)),
            Self::new(c, br),
        ]
    }

    /// The quadrant of [`Aabb::split`] that owns `point`.
    ///
    /// Points on the center lines go south (latitude `>=` center) and east
    /// (longitude `>=` center).
    pub fn quadrant(&self, point: &Coordinate) -> Quadrant {
        let c = self.center();
        let south = point.latitude >= c.latitude;
        let east = point.longitude >= c.longitude;
        match (south, east) {
            (false, false) => Quadrant::NorthWest,
            (false, true) => Quadrant::NorthEast,
            (true, false) => Quadrant::SouthWest,
            (true, true) => Quadrant::SouthEast,
        }
    }
}

impl fmt::Display for Aabb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.top_left, self.bottom_right)
    }
}

#[inline]
fn axis_distance(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min - value
    } else if value > max {
        value - max
    } else {
        0.0
    }
}
