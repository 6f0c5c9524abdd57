//! Mock directions provider for testing without API access.
//!
//! Serves canned routes and records every request so tests can assert how
//! many times the network would have been hit.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::{RouteGeometry, RouteKey};

use super::RouteProvider;
use super::error::RouteError;

/// How the mock answers keys it has no canned response for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Fail with `RoutingUnavailable` (HTTP 404)
    NotFound,
    /// Return a two-point line from source to destination
    StraightLine,
}

/// Recording mock implementation of [`RouteProvider`].
#[derive(Debug)]
pub struct MockRoutingClient {
    responses: HashMap<RouteKey, Result<RouteGeometry, RouteError>>,
    fallback: Fallback,
    calls: Mutex<Vec<RouteKey>>,
}

impl MockRoutingClient {
    /// A mock that fails for every key not explicitly added.
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            fallback: Fallback::NotFound,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A mock that answers every key with a straight line.
    pub fn straight_lines() -> Self {
        Self {
            fallback: Fallback::StraightLine,
            ..Self::new()
        }
    }

    /// Serve `geometry` for `key`.
    pub fn with_route(mut self, key: RouteKey, geometry: RouteGeometry) -> Self {
        self.responses.insert(key, Ok(geometry));
        self
    }

    /// Fail requests for `key` with `error`.
    pub fn with_error(mut self, key: RouteKey, error: RouteError) -> Self {
        self.responses.insert(key, Err(error));
        self
    }

    /// Number of fetches made so far.
    pub fn call_count(&self) -> usize {
        self.lock_calls().len()
    }

    /// Every key fetched, in request order.
    pub fn calls(&self) -> Vec<RouteKey> {
        self.lock_calls().clone()
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<RouteKey>> {
        // A panic while holding the lock only loses the push in progress
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MockRoutingClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteProvider for MockRoutingClient {
    async fn fetch(&self, key: &RouteKey) -> Result<RouteGeometry, RouteError> {
        self.lock_calls().push(*key);

        if let Some(response) = self.responses.get(key) {
            return response.clone();
        }

        match self.fallback {
            Fallback::NotFound => Err(RouteError::RoutingUnavailable {
                status: Some(404),
                message: format!("no mock route for {key}"),
            }),
            Fallback::StraightLine => Ok(RouteGeometry::new(vec![key.source, key.destination])),
        }
    }
}
