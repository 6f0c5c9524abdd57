//! Geodetic coordinate type.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Error returned when a coordinate is outside the geodetic range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinate ({lon}, {lat}): {reason}")]
pub struct InvalidCoordinate {
    lon: f64,
    lat: f64,
    reason: &'static str,
}

/// A WGS84 position in degrees.
///
/// Fields are named rather than positional: longitude is always `lon`,
/// latitude is always `lat`, whatever order an upstream data source uses.
/// Any `GeoPoint` is finite with `|lon| <= 180` and `|lat| <= 90`.
///
/// Equality is exact (no epsilon), and `-0.0` equals `0.0`.
///
/// # Examples
///
/// ```
/// use bike_router::domain::GeoPoint;
///
/// let la = GeoPoint::new(-118.243, 34.0522).unwrap();
/// assert_eq!(la.lon(), -118.243);
/// assert_eq!(la.lat_lon(), (34.0522, -118.243));
///
/// assert!(GeoPoint::new(181.0, 0.0).is_err());
/// assert!(GeoPoint::new(0.0, -90.5).is_err());
/// ```
#[derive(Clone, Copy, PartialEq)]
pub struct GeoPoint {
    lon: f64,
    lat: f64,
}

impl GeoPoint {
    /// Create a point from longitude and latitude in degrees.
    pub fn new(lon: f64, lat: f64) -> Result<Self, InvalidCoordinate> {
        let invalid = |reason| InvalidCoordinate { lon, lat, reason };

        if !lon.is_finite() || !lat.is_finite() {
            return Err(invalid("coordinates must be finite"));
        }
        if lon.abs() > 180.0 {
            return Err(invalid("longitude must be within [-180, 180]"));
        }
        if lat.abs() > 90.0 {
            return Err(invalid("latitude must be within [-90, 90]"));
        }

        Ok(Self { lon, lat })
    }

    /// Create a point from a `[lon, lat]` position as used by GeoJSON.
    pub fn from_lon_lat(position: &[f64]) -> Result<Self, InvalidCoordinate> {
        match position {
            [lon, lat, ..] => Self::new(*lon, *lat),
            _ => Err(InvalidCoordinate {
                lon: f64::NAN,
                lat: f64::NAN,
                reason: "position needs at least two components",
            }),
        }
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// The point as `(lat, lon)`, the order map polylines expect.
    pub fn lat_lon(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }

    /// The point as `[lon, lat]`, the order GeoJSON uses.
    pub fn to_lon_lat(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    /// Bit patterns of `(lon, lat)` with negative zero folded into zero.
    ///
    /// Two points are equal iff their key bits are equal.
    pub fn key_bits(&self) -> (u64, u64) {
        (canonical_bits(self.lon), canonical_bits(self.lat))
    }
}

fn canonical_bits(v: f64) -> u64 {
    if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() }
}

// Construction rejects NaN, so equality is reflexive.
impl Eq for GeoPoint {}

impl Hash for GeoPoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key_bits().hash(state);
    }
}

impl fmt::Debug for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GeoPoint(lon={}, lat={})", self.lon, self.lat)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lon, self.lat)
    }
}
