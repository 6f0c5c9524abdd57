use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bike_router::cache::{DEFAULT_ROUTES_DIR, RouteCache, RouteCacheConfig};
use bike_router::planner::{PlannerConfig, RoutePlanner, StationFinder};
use bike_router::projection::{ProjectionConfig, Projector};
use bike_router::routing::{RoutingClient, RoutingConfig};
use bike_router::stations::{
    DEFAULT_SNAPSHOT_PATH, StationFeedClient, StationFeedConfig, StationRepository,
};
use bike_router::web::{AppState, create_router};

const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Settings read from the environment at startup.
struct ServerConfig {
    addr: SocketAddr,
    api_key: String,
    snapshot_path: PathBuf,
    routes_dir: PathBuf,
    refresh_on_start: bool,
}

impl ServerConfig {
    fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let addr = env_or("BIKE_ROUTER_ADDR", DEFAULT_ADDR)
            .parse()
            .map_err(|e| format!("invalid BIKE_ROUTER_ADDR: {e}"))?;

        let api_key = std::env::var("ORS_API_KEY").unwrap_or_else(|_| {
            warn!("ORS_API_KEY not set, route requests will fail");
            String::new()
        });

        Ok(Self {
            addr,
            api_key,
            snapshot_path: env_or("BIKE_ROUTER_SNAPSHOT", DEFAULT_SNAPSHOT_PATH).into(),
            routes_dir: env_or("BIKE_ROUTER_ROUTES_DIR", DEFAULT_ROUTES_DIR).into(),
            refresh_on_start: env_or("BIKE_ROUTER_REFRESH_ON_START", "1") != "0",
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bike_router=info")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    // One-shot refresh; on failure the existing snapshot is served
    if config.refresh_on_start {
        let feed = StationFeedClient::new(StationFeedConfig::new(&config.snapshot_path))?;
        if let Err(e) = feed.refresh().await {
            warn!(error = %e, "station feed refresh failed, using existing snapshot");
        }
    }

    let projector = Projector::new(&ProjectionConfig::default())?;
    let finder = StationFinder::new(StationRepository::new(&config.snapshot_path), projector);

    let routing = RoutingClient::new(RoutingConfig::new(config.api_key))?;
    let cache = RouteCache::new(routing, &RouteCacheConfig::new(&config.routes_dir));
    let planner = RoutePlanner::new(finder.clone(), Arc::new(cache));

    let state = AppState::new(finder, planner, PlannerConfig::default());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, routes_dir = %config.routes_dir.display(), "bike router listening");
    info!("endpoints: GET /health, GET /stations/nearest, GET /route");

    axum::serve(listener, app).await?;
    Ok(())
}
