//! Directions API client.
//!
//! Routes come from OpenRouteService. The free tier is rate limited, so
//! callers should go through [`RouteCache`](crate::cache::RouteCache)
//! rather than using a provider directly.

mod client;
mod error;
mod mock;
mod types;

use std::future::Future;

use crate::domain::{RouteGeometry, RouteKey};

pub use client::{RoutingClient, RoutingConfig};
pub use error::RouteError;
pub use mock::{Fallback, MockRoutingClient};
pub use types::{DirectionsResponse, LineGeometry, RouteFeature, RouteSummary};

/// Source of route geometry for a directed key.
///
/// This abstraction allows the cache and planner to be tested with mock data.
pub trait RouteProvider: Send + Sync {
    /// Fetch the route for `key` with one network round trip.
    ///
    /// Returns `RateLimited` when the API is throttling and
    /// `RoutingUnavailable` for any other failure.
    fn fetch(
        &self,
        key: &RouteKey,
    ) -> impl Future<Output = Result<RouteGeometry, RouteError>> + Send;
}
