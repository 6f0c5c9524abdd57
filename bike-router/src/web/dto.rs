//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::planner::{BikeRoute, RankedStation, RouteLeg};

/// Query for the stations nearest a point.
#[derive(Debug, Deserialize)]
pub struct NearestRequest {
    pub lat: f64,
    pub lon: f64,

    /// "bikes", "docks" or "any" (defaults to bikes)
    pub capability: Option<String>,

    /// Number of stations to return (default 5, capped)
    pub k: Option<usize>,
}

/// Query for a walk, bike, walk route.
#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    pub src_lat: f64,
    pub src_lon: f64,
    pub dest_lat: f64,
    pub dest_lon: f64,
}

/// A station with its distance from the query point.
#[derive(Debug, Serialize)]
pub struct StationResult {
    pub name: String,
    pub address: Option<String>,
    pub lat: f64,
    pub lon: f64,
    pub bikes_available: Option<u32>,
    pub docks_available: Option<u32>,

    /// Straight-line distance in projected metres
    pub distance_m: f64,
}

/// Response for a nearest-station query.
#[derive(Debug, Serialize)]
pub struct NearestResponse {
    /// Nearest first
    pub stations: Vec<StationResult>,
}

/// One leg of a route.
#[derive(Debug, Serialize)]
pub struct LegResult {
    /// "foot-walking" or "cycling-regular"
    pub mode: String,

    /// Polyline as [lat, lon] pairs
    pub coordinates: Vec<(f64, f64)>,
}

/// Response for route planning.
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub pickup: StationResult,
    pub dropoff: StationResult,

    /// Walk, ride, walk
    pub legs: Vec<LegResult>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

impl StationResult {
    /// Create from a ranked station.
    pub fn from_ranked(ranked: &RankedStation) -> Self {
        let station = &ranked.station;
        Self {
            name: station.name.clone(),
            address: station.address.clone(),
            lat: station.location.lat(),
            lon: station.location.lon(),
            bikes_available: station.availability.bikes_available,
            docks_available: station.availability.docks_available,
            distance_m: ranked.distance_m,
        }
    }
}

impl LegResult {
    pub fn from_leg(leg: &RouteLeg) -> Self {
        Self {
            mode: leg.mode().to_string(),
            coordinates: leg.geometry.lat_lon_pairs(),
        }
    }
}

impl RouteResponse {
    /// Create from a planned route.
    pub fn from_route(route: &BikeRoute) -> Self {
        Self {
            pickup: StationResult::from_ranked(&route.pickup),
            dropoff: StationResult::from_ranked(&route.dropoff),
            legs: route.legs.iter().map(LegResult::from_leg).collect(),
        }
    }
}
