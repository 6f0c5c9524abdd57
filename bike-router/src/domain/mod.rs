//! Domain types for the bike-share router.
//!
//! These types enforce their invariants at construction time: a `GeoPoint`
//! is always within geodetic range, so code receiving one can project it
//! or use it as a cache key without re-checking.

mod geo;
mod route;
mod station;

pub use geo::{GeoPoint, InvalidCoordinate};
pub use route::{RouteGeometry, RouteKey, TravelMode, UnknownTravelMode};
pub use station::{Availability, Station};
