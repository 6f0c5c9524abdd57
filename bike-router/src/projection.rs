//! Planar projection of geodetic coordinates.
//!
//! Stations and query points are projected from WGS84 (EPSG:4326) to
//! Web Mercator (EPSG:3857) so that distances can be compared with plain
//! Euclidean arithmetic. Both sides of every comparison must go through the
//! same `Projector`.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::domain::{GeoPoint, InvalidCoordinate};

/// WGS84 semi-major axis, as used by EPSG:3857.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Latitude at which Web Mercator becomes square. Beyond this the
/// projection diverges, so latitudes are clamped.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Geodetic source reference system.
pub const WGS84: &str = "EPSG:4326";

/// Planar target reference system.
pub const WEB_MERCATOR: &str = "EPSG:3857";

/// Errors from building a projector.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectionError {
    #[error("unsupported source CRS {0} (expected EPSG:4326)")]
    UnsupportedSource(String),

    #[error("unsupported target CRS {0} (expected EPSG:3857)")]
    UnsupportedTarget(String),
}

/// Reference systems for the projector.
#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    pub source_crs: String,
    pub target_crs: String,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            source_crs: WGS84.to_string(),
            target_crs: WEB_MERCATOR.to_string(),
        }
    }
}

/// A position in projected metres.
///
/// Only a `Projector` produces these, so two `ProjectedPoint`s are always
/// in the same system and their distance is meaningful.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    x: f64,
    y: f64,
}

impl ProjectedPoint {
    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Euclidean distance in projected metres.
    pub fn distance_to(&self, other: &ProjectedPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Converts between WGS84 degrees and Web Mercator metres.
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    radius: f64,
}

impl Projector {
    /// Build a projector for the configured reference systems.
    ///
    /// Only `EPSG:4326 -> EPSG:3857` is supported.
    pub fn new(config: &ProjectionConfig) -> Result<Self, ProjectionError> {
        if !config.source_crs.eq_ignore_ascii_case(WGS84) {
            return Err(ProjectionError::UnsupportedSource(
                config.source_crs.clone(),
            ));
        }
        if !config.target_crs.eq_ignore_ascii_case(WEB_MERCATOR) {
            return Err(ProjectionError::UnsupportedTarget(
                config.target_crs.clone(),
            ));
        }
        Ok(Self::web_mercator())
    }

    /// The default WGS84 -> Web Mercator projector.
    pub fn web_mercator() -> Self {
        Self {
            radius: EARTH_RADIUS,
        }
    }

    /// Project a point to planar metres.
    pub fn to_planar(&self, point: &GeoPoint) -> ProjectedPoint {
        let lat = point.lat().clamp(-MAX_LATITUDE, MAX_LATITUDE);
        let x = self.radius * point.lon().to_radians();
        let y = self.radius * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
        ProjectedPoint { x, y }
    }

    /// Project a sequence of points, preserving order.
    pub fn batch_to_planar<'a, I>(&self, points: I) -> Vec<ProjectedPoint>
    where
        I: IntoIterator<Item = &'a GeoPoint>,
    {
        points.into_iter().map(|p| self.to_planar(p)).collect()
    }

    /// Inverse projection back to degrees.
    ///
    /// Only latitudes within ±[`MAX_LATITUDE`] (about 85.0511°) survive a
    /// round trip. [`to_planar`](Self::to_planar) clamps anything beyond, so
    /// a polar point comes back at the clamp latitude with its longitude
    /// intact.
    pub fn to_geodetic(&self, point: &ProjectedPoint) -> Result<GeoPoint, InvalidCoordinate> {
        let lon = (point.x / self.radius).to_degrees();
        let lat = (2.0 * (point.y / self.radius).exp().atan() - FRAC_PI_2).to_degrees();
        GeoPoint::new(lon, lat)
    }
}

impl Default for Projector {
    fn default() -> Self {
        Self::web_mercator()
    }
}
