//! Points on the surface of the Earth.
use std::cmp::Ordering;
use std::fmt;

use crate::metric::{cmp_distance, MetricItem};

/// Mean Earth radius in meters (WGS84).
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// A point with a latitude and longitude in degrees, whose distance to
/// other points is measured in meters along the surface of the Earth.
pub trait GeospatialPoint: MetricItem<f64> {
    fn latitude(&self) -> f64;
    fn longitude(&self) -> f64;
}

/// Great-circle distance in meters between two coordinates given in degrees,
/// using the haversine formula.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_METERS * c
}

/// A bare latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimpleGeospatialPoint {
    latitude: f64,
    longitude: f64,
}

impl SimpleGeospatialPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        SimpleGeospatialPoint { latitude, longitude }
    }
}

impl MetricItem<f64> for SimpleGeospatialPoint {
    fn distance(&self, other: &Self) -> f64 {
        haversine_distance(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

impl GeospatialPoint for SimpleGeospatialPoint {
    fn latitude(&self) -> f64 {
        self.latitude
    }

    fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for SimpleGeospatialPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// A latitude/longitude rectangle with inclusive edges.
///
/// When `west` is greater than `east` the box crosses the antimeridian and
/// covers longitudes from `west` to 180 and from -180 to `east`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub west: f64,
    pub east: f64,
    pub north: f64,
    pub south: f64,
}

impl BoundingBox {
    pub fn new(west: f64, east: f64, north: f64, south: f64) -> BoundingBox {
        BoundingBox { west, east, north, south }
    }

    pub fn crosses_antimeridian(&self) -> bool {
        self.west > self.east
    }

    pub fn contains<P: GeospatialPoint + ?Sized>(&self, point: &P) -> bool {
        let (lat, lon) = (point.latitude(), point.longitude());
        if lat < self.south || lat > self.north {
            return false;
        }

        if self.crosses_antimeridian() {
            lon >= self.west || lon <= self.east
        } else {
            lon >= self.west && lon <= self.east
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoundingBox(w={}, e={}, n={}, s={})", self.west, self.east, self.north, self.south)
    }
}

/// Order points by increasing distance from `origin`.
///
/// ```
/// use geo_vptree::{compare_by_distance, SimpleGeospatialPoint};
///
/// let origin = SimpleGeospatialPoint::new(0.0, 0.0);
/// let mut points = vec![
///     SimpleGeospatialPoint::new(10.0, 0.0),
///     SimpleGeospatialPoint::new(1.0, 0.0),
/// ];
/// points.sort_by(compare_by_distance(&origin));
/// assert_eq!(points[0], SimpleGeospatialPoint::new(1.0, 0.0));
/// ```
pub fn compare_by_distance<'o, T: MetricItem<f64>>(origin: &'o T) -> impl Fn(&T, &T) -> Ordering + 'o {
    move |a, b| cmp_distance(&origin.distance(a), &origin.distance(b))
}
