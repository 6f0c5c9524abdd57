//! OpenRouteService directions client.
//!
//! One GET per route. Failures are classified so callers can tell
//! throttling apart from everything else.

use tracing::{debug, warn};

use crate::domain::{RouteGeometry, RouteKey};

use super::RouteProvider;
use super::error::RouteError;
use super::types::{DirectionsResponse, error_message};

/// Default base URL for the OpenRouteService API.
const DEFAULT_BASE_URL: &str = "https://api.openrouteservice.org";

/// Configuration for the routing client.
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    /// OpenRouteService API key
    pub api_key: String,
    /// Base URL for the API (defaults to the public ORS instance)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl RoutingConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing or a self-hosted instance).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Directions API client.
#[derive(Debug, Clone)]
pub struct RoutingClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RoutingClient {
    /// Create a new routing client with the given configuration.
    pub fn new(config: RoutingConfig) -> Result<Self, RouteError> {
        if config.timeout_secs == 0 {
            return Err(RouteError::unavailable("routing timeout must be non-zero"));
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }

    fn directions_url(&self, key: &RouteKey) -> String {
        format!("{}/v2/directions/{}", self.base_url, key.mode.as_str())
    }
}

impl RouteProvider for RoutingClient {
    async fn fetch(&self, key: &RouteKey) -> Result<RouteGeometry, RouteError> {
        let url = self.directions_url(key);
        debug!(%key, "requesting directions");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("api_key", self.api_key.clone()),
                ("start", key.source.to_string()),
                ("end", key.destination.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!(%key, "routing API limit reached");
            return Err(RouteError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RouteError::RoutingUnavailable {
                status: Some(status.as_u16()),
                message: format!("API error {}: {}", status.as_u16(), error_message(&body)),
            });
        }

        let body = response.text().await?;

        let directions: DirectionsResponse = serde_json::from_str(&body).map_err(|e| {
            RouteError::unavailable(format!(
                "JSON parse error: {e} (body: {})",
                body.chars().take(500).collect::<String>()
            ))
        })?;

        if let Some(summary) = directions.first_summary() {
            debug!(
                %key,
                distance_m = summary.distance,
                duration_s = summary.duration,
                "received route"
            );
        }

        directions.first_geometry()
    }
}
