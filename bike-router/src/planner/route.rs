//! Walk, bike, walk route assembly.

use std::sync::Arc;

use tracing::info;

use crate::cache::RouteCache;
use crate::domain::{GeoPoint, RouteGeometry, RouteKey, TravelMode};
use crate::routing::RouteProvider;

use super::error::PlanError;
use super::filter::Capability;
use super::finder::StationFinder;
use super::rank::RankedStation;

/// One travel-mode segment of a route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLeg {
    pub key: RouteKey,
    pub geometry: RouteGeometry,
}

impl RouteLeg {
    pub fn mode(&self) -> TravelMode {
        self.key.mode
    }
}

/// A complete route: walk to a station with bikes, ride to a station with
/// free docks, walk to the destination.
#[derive(Debug, Clone, PartialEq)]
pub struct BikeRoute {
    /// Where the bike is picked up, with its distance from the source
    pub pickup: RankedStation,
    /// Where the bike is returned, with its distance from the destination
    pub dropoff: RankedStation,
    /// Walk, ride, walk, in traversal order
    pub legs: [RouteLeg; 3],
}

/// Plans bike-share routes between two points.
pub struct RoutePlanner<P> {
    finder: StationFinder,
    routes: Arc<RouteCache<P>>,
}

impl<P: RouteProvider> RoutePlanner<P> {
    pub fn new(finder: StationFinder, routes: Arc<RouteCache<P>>) -> Self {
        Self { finder, routes }
    }

    /// Plan a route from `source` to `destination`.
    ///
    /// Fails with `LoadFailure` if no station has a bike near the source or
    /// a free dock near the destination, and with the routing error if any
    /// leg cannot be fetched. Legs fetched before a failure stay cached.
    pub async fn plan(
        &self,
        source: &GeoPoint,
        destination: &GeoPoint,
    ) -> Result<BikeRoute, PlanError> {
        let stations = self.finder.load()?;

        let pickup = self
            .finder
            .nearest_in(&stations, source, Capability::BikesAvailable, 1)?
            .into_iter()
            .next()
            .ok_or_else(|| {
                PlanError::LoadFailure(format!("no station with bikes available near {source}"))
            })?;

        let dropoff = self
            .finder
            .nearest_in(&stations, destination, Capability::DocksAvailable, 1)?
            .into_iter()
            .next()
            .ok_or_else(|| {
                PlanError::LoadFailure(format!(
                    "no station with docks available near {destination}"
                ))
            })?;

        let walk_to = RouteKey::new(TravelMode::FootWalking, *source, pickup.station.location);
        let ride = RouteKey::new(
            TravelMode::CyclingRegular,
            pickup.station.location,
            dropoff.station.location,
        );
        let walk_from = RouteKey::new(
            TravelMode::FootWalking,
            dropoff.station.location,
            *destination,
        );

        // In traversal order; a failed leg stops the plan before the next request
        let walk_to_geometry = self.routes.get_or_fetch(&walk_to).await?;
        let ride_geometry = self.routes.get_or_fetch(&ride).await?;
        let walk_from_geometry = self.routes.get_or_fetch(&walk_from).await?;

        info!(
            pickup = %pickup.station.name,
            dropoff = %dropoff.station.name,
            "planned bike route"
        );

        Ok(BikeRoute {
            pickup,
            dropoff,
            legs: [
                RouteLeg {
                    key: walk_to,
                    geometry: walk_to_geometry,
                },
                RouteLeg {
                    key: ride,
                    geometry: ride_geometry,
                },
                RouteLeg {
                    key: walk_from,
                    geometry: walk_from_geometry,
                },
            ],
        })
    }

    /// The station finder used for pickup and drop-off lookups.
    pub fn finder(&self) -> &StationFinder {
        &self.finder
    }

    /// The route cache behind this planner.
    pub fn routes(&self) -> &RouteCache<P> {
        &self.routes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::RouteCacheConfig;
    use crate::projection::Projector;
    use crate::routing::{MockRoutingClient, RouteError};
    use crate::stations::StationRepository;
    use tempfile::{TempDir, tempdir};

    /// West station has bikes but no docks, east station docks but no bikes.
    const SNAPSHOT: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [-118.2600, 34.0500] },
                "properties": { "name": "West", "bikesAvailable": 4, "docksAvailable": 0 }
            },
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [-118.2400, 34.0500] },
                "properties": { "name": "East", "bikesAvailable": 0, "docksAvailable": 6 }
            }
        ]
    }"#;

    fn point(lon: f64, lat: f64) -> GeoPoint {
        GeoPoint::new(lon, lat).unwrap()
    }

    fn planner_with(
        snapshot: &str,
        mock: MockRoutingClient,
    ) -> (TempDir, RoutePlanner<MockRoutingClient>) {
        let dir = tempdir().unwrap();
        let snapshot_path = dir.path().join("stations.json");
        std::fs::write(&snapshot_path, snapshot).unwrap();

        let finder = StationFinder::new(
            StationRepository::new(snapshot_path),
            Projector::web_mercator(),
        );
        let cache = RouteCache::new(mock, &RouteCacheConfig::new(dir.path().join("routes")));
        (dir, RoutePlanner::new(finder, Arc::new(cache)))
    }

    #[tokio::test]
    async fn assembles_three_legs() {
        let (_dir, planner) = planner_with(SNAPSHOT, MockRoutingClient::straight_lines());
        // Source is next to East, but East has no bikes
        let source = point(-118.2401, 34.0501);
        let destination = point(-118.2399, 34.0499);

        let route = planner.plan(&source, &destination).await.unwrap();

        assert_eq!(route.pickup.station.name, "West");
        assert_eq!(route.dropoff.station.name, "East");

        let modes: Vec<_> = route.legs.iter().map(RouteLeg::mode).collect();
        assert_eq!(
            modes,
            vec![
                TravelMode::FootWalking,
                TravelMode::CyclingRegular,
                TravelMode::FootWalking
            ]
        );

        assert_eq!(route.legs[0].key.source, source);
        assert_eq!(route.legs[0].key.destination, point(-118.26, 34.05));
        assert_eq!(route.legs[1].key.destination, point(-118.24, 34.05));
        assert_eq!(route.legs[2].key.destination, destination);
        assert_eq!(planner.routes().provider().call_count(), 3);
    }

    #[tokio::test]
    async fn second_plan_uses_cache() {
        let (_dir, planner) = planner_with(SNAPSHOT, MockRoutingClient::straight_lines());
        let source = point(-118.2401, 34.0501);
        let destination = point(-118.2399, 34.0499);

        let first = planner.plan(&source, &destination).await.unwrap();
        let second = planner.plan(&source, &destination).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(planner.routes().provider().call_count(), 3);
    }

    #[tokio::test]
    async fn no_bikes_anywhere_is_load_failure() {
        let snapshot = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [-118.25, 34.05] },
                    "properties": { "name": "Empty", "bikesAvailable": 0, "docksAvailable": 3 }
                }
            ]
        }"#;
        let (_dir, planner) = planner_with(snapshot, MockRoutingClient::straight_lines());

        let err = planner
            .plan(&point(-118.25, 34.05), &point(-118.24, 34.05))
            .await
            .unwrap_err();
        assert!(matches!(err, PlanError::LoadFailure(ref msg) if msg.contains("bikes")));
        assert_eq!(planner.routes().provider().call_count(), 0);
    }

    #[tokio::test]
    async fn rate_limited_leg_fails_the_plan() {
        let ride = RouteKey::new(
            TravelMode::CyclingRegular,
            point(-118.26, 34.05),
            point(-118.24, 34.05),
        );
        let mock = MockRoutingClient::straight_lines().with_error(ride, RouteError::RateLimited);
        let (_dir, planner) = planner_with(SNAPSHOT, mock);

        let err = planner
            .plan(&point(-118.2401, 34.0501), &point(-118.2399, 34.0499))
            .await
            .unwrap_err();
        assert!(matches!(err, PlanError::Route(RouteError::RateLimited)));
        assert!(!planner.routes().contains(&ride));
    }

    #[tokio::test]
    async fn legs_before_a_failure_stay_cached() {
        let source = point(-118.2401, 34.0501);
        let destination = point(-118.2399, 34.0499);
        let walk_to = RouteKey::new(TravelMode::FootWalking, source, point(-118.26, 34.05));
        let ride = RouteKey::new(
            TravelMode::CyclingRegular,
            point(-118.26, 34.05),
            point(-118.24, 34.05),
        );
        let walk_from = RouteKey::new(TravelMode::FootWalking, point(-118.24, 34.05), destination);

        let mock = MockRoutingClient::straight_lines().with_error(ride, RouteError::RateLimited);
        let (_dir, planner) = planner_with(SNAPSHOT, mock);

        planner.plan(&source, &destination).await.unwrap_err();

        assert!(planner.routes().contains(&walk_to));
        assert!(!planner.routes().contains(&walk_from));
        assert_eq!(planner.routes().provider().calls(), vec![walk_to, ride]);
    }

    #[tokio::test]
    async fn missing_snapshot_is_load_failure() {
        let dir = tempdir().unwrap();
        let finder = StationFinder::new(
            StationRepository::new(dir.path().join("missing.json")),
            Projector::web_mercator(),
        );
        let cache = RouteCache::new(
            MockRoutingClient::straight_lines(),
            &RouteCacheConfig::new(dir.path().join("routes")),
        );
        let planner = RoutePlanner::new(finder, Arc::new(cache));

        let err = planner
            .plan(&point(-118.25, 34.05), &point(-118.24, 34.05))
            .await
            .unwrap_err();
        assert!(matches!(err, PlanError::LoadFailure(_)));
    }
}
