//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::domain::GeoPoint;
use crate::planner::{Capability, PlanError};
use crate::routing::{RouteError, RouteProvider};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<P>(state: AppState<P>) -> Router
where
    P: RouteProvider + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/stations/nearest", get(nearest_stations::<P>))
        .route("/route", get(plan_route::<P>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Stations nearest a point, filtered by what the caller needs.
async fn nearest_stations<P>(
    State(state): State<AppState<P>>,
    Query(req): Query<NearestRequest>,
) -> Result<Json<NearestResponse>, AppError> {
    let point = GeoPoint::new(req.lon, req.lat).map_err(PlanError::from)?;

    // An empty `capability=` means the same as leaving it out
    let capability = match req.capability.as_deref().filter(|c| !c.trim().is_empty()) {
        Some(raw) => raw.parse::<Capability>().map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        })?,
        None => Capability::default(),
    };
    let k = state.config.result_count(req.k);

    let ranked = state.finder.find_nearest(&point, capability, k)?;
    let stations = ranked.iter().map(StationResult::from_ranked).collect();

    Ok(Json(NearestResponse { stations }))
}

/// Walk to a bike, ride it, walk to the destination.
async fn plan_route<P: RouteProvider>(
    State(state): State<AppState<P>>,
    Query(req): Query<RouteRequest>,
) -> Result<Json<RouteResponse>, AppError> {
    let source = GeoPoint::new(req.src_lon, req.src_lat).map_err(PlanError::from)?;
    let destination = GeoPoint::new(req.dest_lon, req.dest_lat).map_err(PlanError::from)?;

    let route = state.planner.plan(&source, &destination).await?;

    Ok(Json(RouteResponse::from_route(&route)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NoStationData { message: String },
    RateLimited,
    BadGateway { message: String },
    Internal { message: String },
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::InvalidCoordinate(_) | PlanError::InvalidArgument(_) => {
                AppError::BadRequest {
                    message: e.to_string(),
                }
            }
            PlanError::LoadFailure(message) => AppError::NoStationData { message },
            PlanError::Route(route) => route.into(),
        }
    }
}

impl From<RouteError> for AppError {
    fn from(e: RouteError) -> Self {
        match e {
            RouteError::RateLimited => AppError::RateLimited,
            RouteError::RoutingUnavailable { .. } => AppError::BadGateway {
                message: e.to_string(),
            },
            RouteError::Cache { .. } => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NoStationData { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::BadGateway { .. } => StatusCode::BAD_GATEWAY,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::BadRequest { message } => message,
            AppError::NoStationData { message } => {
                warn!(%message, "no station data");
                format!("no station data available: {message}")
            }
            AppError::RateLimited => "routing API limit reached, try again later".to_string(),
            AppError::BadGateway { message } => {
                warn!(%message, "routing API failed");
                message
            }
            AppError::Internal { message } => {
                error!(%message, "internal error");
                message
            }
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{RouteCache, RouteCacheConfig};
    use crate::domain::{RouteKey, TravelMode};
    use crate::planner::{PlannerConfig, RoutePlanner, StationFinder};
    use crate::projection::Projector;
    use crate::routing::{MockRoutingClient, RoutingClient, RoutingConfig};
    use crate::stations::StationRepository;
    use std::sync::Arc;
    use tempfile::{TempDir, tempdir};

    const SNAPSHOT: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [-118.2600, 34.0500] },
                "properties": { "name": "West", "addressStreet": "1 West St", "bikesAvailable": 4, "docksAvailable": 0 }
            },
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [-118.2400, 34.0500] },
                "properties": { "name": "East", "addressStreet": "1 East St", "bikesAvailable": 0, "docksAvailable": 6 }
            }
        ]
    }"#;

    fn state_with(
        snapshot: Option<&str>,
        mock: MockRoutingClient,
    ) -> (TempDir, AppState<MockRoutingClient>) {
        let dir = tempdir().unwrap();
        let snapshot_path = dir.path().join("stations.json");
        if let Some(contents) = snapshot {
            std::fs::write(&snapshot_path, contents).unwrap();
        }

        let finder = StationFinder::new(
            StationRepository::new(snapshot_path),
            Projector::web_mercator(),
        );
        let cache = RouteCache::new(mock, &RouteCacheConfig::new(dir.path().join("routes")));
        let planner = RoutePlanner::new(finder.clone(), Arc::new(cache));
        (dir, AppState::new(finder, planner, PlannerConfig::default()))
    }

    fn nearest(lat: f64, lon: f64, capability: Option<&str>, k: Option<usize>) -> NearestRequest {
        NearestRequest {
            lat,
            lon,
            capability: capability.map(String::from),
            k,
        }
    }

    fn route_request() -> RouteRequest {
        RouteRequest {
            src_lat: 34.0501,
            src_lon: -118.2401,
            dest_lat: 34.0499,
            dest_lon: -118.2399,
        }
    }

    fn point(lon: f64, lat: f64) -> GeoPoint {
        GeoPoint::new(lon, lat).unwrap()
    }

    #[tokio::test]
    async fn health_check() {
        assert_eq!(health().await, "ok");
    }

    #[tokio::test]
    async fn nearest_defaults_to_bikes() {
        let (_dir, state) = state_with(Some(SNAPSHOT), MockRoutingClient::new());

        let Json(response) = nearest_stations(State(state), Query(nearest(34.05, -118.24, None, None)))
            .await
            .unwrap();

        assert_eq!(response.stations.len(), 1);
        assert_eq!(response.stations[0].name, "West");
        assert_eq!(response.stations[0].address.as_deref(), Some("1 West St"));
    }

    #[tokio::test]
    async fn empty_capability_defaults_to_bikes() {
        let (_dir, state) = state_with(Some(SNAPSHOT), MockRoutingClient::new());

        let Json(response) = nearest_stations(
            State(state),
            Query(nearest(34.05, -118.24, Some(""), None)),
        )
        .await
        .unwrap();

        let names: Vec<_> = response.stations.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["West"]);
    }

    #[tokio::test]
    async fn nearest_any_orders_by_distance() {
        let (_dir, state) = state_with(Some(SNAPSHOT), MockRoutingClient::new());

        let Json(response) = nearest_stations(
            State(state),
            Query(nearest(34.05, -118.2401, Some("any"), Some(10))),
        )
        .await
        .unwrap();

        let names: Vec<_> = response.stations.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["East", "West"]);
        assert!(response.stations[0].distance_m < response.stations[1].distance_m);
    }

    #[tokio::test]
    async fn nearest_rejects_bad_input() {
        let (_dir, state) = state_with(Some(SNAPSHOT), MockRoutingClient::new());

        let err = nearest_stations(State(state.clone()), Query(nearest(91.0, 0.0, None, None)))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = nearest_stations(
            State(state.clone()),
            Query(nearest(34.05, -118.24, Some("scooters"), None)),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = nearest_stations(State(state), Query(nearest(34.05, -118.24, None, Some(0))))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_snapshot_is_service_unavailable() {
        let (_dir, state) = state_with(None, MockRoutingClient::new());

        let err = nearest_stations(State(state), Query(nearest(34.05, -118.24, None, None)))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn route_has_three_legs() {
        let (_dir, state) = state_with(Some(SNAPSHOT), MockRoutingClient::straight_lines());

        let Json(response) = plan_route(State(state), Query(route_request()))
            .await
            .unwrap();

        assert_eq!(response.pickup.name, "West");
        assert_eq!(response.dropoff.name, "East");
        let modes: Vec<_> = response.legs.iter().map(|l| l.mode.as_str()).collect();
        assert_eq!(modes, vec!["foot-walking", "cycling-regular", "foot-walking"]);
        assert_eq!(response.legs[0].coordinates[0], (34.0501, -118.2401));
    }

    #[tokio::test]
    async fn rate_limited_route_is_429() {
        let ride = RouteKey::new(
            TravelMode::CyclingRegular,
            point(-118.26, 34.05),
            point(-118.24, 34.05),
        );
        let mock = MockRoutingClient::straight_lines().with_error(ride, RouteError::RateLimited);
        let (_dir, state) = state_with(Some(SNAPSHOT), mock);

        let err = plan_route(State(state), Query(route_request()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn error_status_mapping() {
        let cases = [
            (
                AppError::from(PlanError::InvalidArgument("k".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(PlanError::LoadFailure("gone".into())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::from(PlanError::Route(RouteError::RateLimited)),
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (
                AppError::from(RouteError::RoutingUnavailable {
                    status: Some(500),
                    message: "down".into(),
                }),
                StatusCode::BAD_GATEWAY,
            ),
            (
                AppError::from(RouteError::Cache {
                    message: "disk full".into(),
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn unavailable_body_hides_api_key() {
        let config = RoutingConfig::new("ors-test-key-5f3a")
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(2);
        let client = RoutingClient::new(config).unwrap();
        let key = RouteKey::new(
            TravelMode::FootWalking,
            point(-118.26, 34.05),
            point(-118.24, 34.05),
        );

        let err = client.fetch(&key).await.unwrap_err();
        let response = AppError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("routing unavailable"), "{body}");
        assert!(!body.contains("ors-test-key-5f3a"), "{body}");
    }

    #[test]
    fn router_builds() {
        let (_dir, state) = state_with(Some(SNAPSHOT), MockRoutingClient::new());
        let _router = create_router(state);
    }
}
