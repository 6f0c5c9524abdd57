//! Station snapshot loading.
//!
//! The snapshot is a GeoJSON feature collection in the shape published by
//! the Metro Bike Share station feed: each feature has a point geometry and
//! properties such as `name`, `addressStreet`, `bikesAvailable` and
//! `docksAvailable`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use geojson::{Feature, FeatureCollection, GeoJson, Value};
use tracing::{debug, warn};

use crate::domain::{Availability, GeoPoint, Station};

use super::error::StationError;

/// Default snapshot location, relative to the working directory.
pub const DEFAULT_SNAPSHOT_PATH: &str = "stations/stations.json";

/// Reads the station inventory from a local snapshot file.
///
/// Every call to [`load`](Self::load) reads the file again, so a snapshot
/// replaced on disk is picked up by the next query.
#[derive(Debug, Clone)]
pub struct StationRepository {
    path: PathBuf,
}

impl StationRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the current snapshot.
    ///
    /// Stations keep the order they appear in the file. Features without a
    /// usable location or name are skipped.
    pub fn load(&self) -> Result<Vec<Arc<Station>>, StationError> {
        let contents =
            std::fs::read_to_string(&self.path).map_err(|e| StationError::LoadFailure {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        let stations = parse_snapshot(&contents).map_err(|message| StationError::LoadFailure {
            path: self.path.clone(),
            message,
        })?;

        debug!(path = %self.path.display(), count = stations.len(), "loaded station snapshot");
        Ok(stations.into_iter().map(Arc::new).collect())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for StationRepository {
    fn default() -> Self {
        Self::new(DEFAULT_SNAPSHOT_PATH)
    }
}

/// Parse a feature collection into stations.
pub(crate) fn parse_snapshot(contents: &str) -> Result<Vec<Station>, String> {
    let geojson: GeoJson = contents.parse().map_err(|e: geojson::Error| e.to_string())?;
    let collection = FeatureCollection::try_from(geojson).map_err(|e| e.to_string())?;

    let total = collection.features.len();
    let stations: Vec<Station> = collection
        .features
        .iter()
        .filter_map(station_from_feature)
        .collect();

    if stations.len() < total {
        warn!(
            skipped = total - stations.len(),
            total, "skipped snapshot features without a name or valid location"
        );
    }

    Ok(stations)
}

fn station_from_feature(feature: &Feature) -> Option<Station> {
    let name = feature.property("name")?.as_str()?.to_string();
    let location = feature_location(feature)?;

    let availability = Availability {
        bikes_available: counter(feature, "bikesAvailable"),
        docks_available: counter(feature, "docksAvailable"),
    };

    Some(Station {
        kiosk_id: feature.property("kioskId").and_then(|v| v.as_u64()),
        name,
        address: feature
            .property("addressStreet")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        location,
        availability,
    })
}

/// Location from the point geometry, falling back to the
/// `longitude`/`latitude` properties the feed also carries.
fn feature_location(feature: &Feature) -> Option<GeoPoint> {
    if let Some(geometry) = &feature.geometry
        && let Value::Point(position) = &geometry.value
    {
        return GeoPoint::from_lon_lat(position).ok();
    }

    let lon = feature.property("longitude")?.as_f64()?;
    let lat = feature.property("latitude")?.as_f64()?;
    GeoPoint::new(lon, lat).ok()
}

fn counter(feature: &Feature, key: &str) -> Option<u32> {
    feature
        .property(key)
        .and_then(|v| v.as_u64())
        .and_then(|n| u32::try_from(n).ok())
}
