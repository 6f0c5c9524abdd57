//! Route keys and geometry.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::GeoPoint;

/// Error returned when parsing an unknown travel mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown travel mode: {0}")]
pub struct UnknownTravelMode(String);

/// Directions profile used for one leg of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TravelMode {
    FootWalking,
    CyclingRegular,
}

impl TravelMode {
    /// The profile name used in directions URLs and cache file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::FootWalking => "foot-walking",
            TravelMode::CyclingRegular => "cycling-regular",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = UnknownTravelMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "foot-walking" => Ok(TravelMode::FootWalking),
            "cycling-regular" => Ok(TravelMode::CyclingRegular),
            other => Err(UnknownTravelMode(other.to_string())),
        }
    }
}

/// Identity of a directed route request: mode plus ordered endpoints.
///
/// `(mode, a, b)` and `(mode, b, a)` are different keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteKey {
    pub mode: TravelMode,
    pub source: GeoPoint,
    pub destination: GeoPoint,
}

impl RouteKey {
    pub fn new(mode: TravelMode, source: GeoPoint, destination: GeoPoint) -> Self {
        Self {
            mode,
            source,
            destination,
        }
    }

    /// Deterministic, filesystem-safe identifier for this key.
    ///
    /// Format: `{mode}_{src_lon}_{src_lat}_{dst_lon}_{dst_lat}` where each
    /// coordinate is the 16-digit hex IEEE-754 bit pattern (negative zero
    /// folded into zero). The encoding is injective: two keys produce the
    /// same identifier iff they are equal.
    pub fn identifier(&self) -> String {
        let (src_lon, src_lat) = self.source.key_bits();
        let (dst_lon, dst_lat) = self.destination.key_bits();
        format!(
            "{}_{:016x}_{:016x}_{:016x}_{:016x}",
            self.mode.as_str(),
            src_lon,
            src_lat,
            dst_lon,
            dst_lat
        )
    }

    /// The same request in the opposite direction.
    pub fn reversed(&self) -> Self {
        Self::new(self.mode, self.destination, self.source)
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}", self.mode, self.source, self.destination)
    }
}

/// A path in traversal order. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGeometry(Arc<[GeoPoint]>);

impl RouteGeometry {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self(points.into())
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Points as `(lat, lon)` pairs for polyline rendering.
    pub fn lat_lon_pairs(&self) -> Vec<(f64, f64)> {
        self.0.iter().map(GeoPoint::lat_lon).collect()
    }
}
