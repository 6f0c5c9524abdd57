//! OpenRouteService directions response types.
//!
//! The GET directions endpoint returns GeoJSON: a feature collection whose
//! features are alternative routes, each with a `LineString` geometry in
//! `[lon, lat]` order. Only the fields we use are modelled.

use serde::Deserialize;

use crate::domain::{GeoPoint, RouteGeometry};

use super::error::RouteError;

/// Directions response body.
#[derive(Debug, Deserialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub features: Vec<RouteFeature>,
}

/// One route in the response.
#[derive(Debug, Deserialize)]
pub struct RouteFeature {
    pub geometry: LineGeometry,
    #[serde(default)]
    pub properties: Option<RouteProperties>,
}

/// Route line, `[lon, lat]` or `[lon, lat, elevation]` positions.
#[derive(Debug, Deserialize)]
pub struct LineGeometry {
    pub coordinates: Vec<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
pub struct RouteProperties {
    #[serde(default)]
    pub summary: Option<RouteSummary>,
}

/// Route totals. ORS omits both fields for zero-length routes.
#[derive(Debug, Deserialize)]
pub struct RouteSummary {
    /// Metres
    #[serde(default)]
    pub distance: f64,
    /// Seconds
    #[serde(default)]
    pub duration: f64,
}

impl DirectionsResponse {
    /// Geometry of the first route, converted to domain points.
    ///
    /// Positions arrive as `[lon, lat]`; this is the one place that order is
    /// interpreted, so every `GeoPoint` downstream has its latitude in `lat`.
    pub fn first_geometry(&self) -> Result<RouteGeometry, RouteError> {
        let feature = self
            .features
            .first()
            .ok_or_else(|| RouteError::unavailable("directions response contained no routes"))?;

        let points = feature
            .geometry
            .coordinates
            .iter()
            .map(|position| GeoPoint::from_lon_lat(position))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| RouteError::unavailable(format!("invalid route coordinate: {e}")))?;

        Ok(RouteGeometry::new(points))
    }

    /// Summary of the first route, if present.
    pub fn first_summary(&self) -> Option<&RouteSummary> {
        self.features
            .first()
            .and_then(|f| f.properties.as_ref())
            .and_then(|p| p.summary.as_ref())
    }
}

/// Extract a human-readable message from an ORS error body.
///
/// ORS reports errors either as `{"error": "text"}` or as
/// `{"error": {"code": 2010, "message": "text"}}`.
pub fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.chars().take(500).collect();
    };

    match value.get("error") {
        Some(serde_json::Value::String(message)) => message.clone(),
        Some(error) => error
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string()),
        None => body.chars().take(500).collect(),
    }
}
