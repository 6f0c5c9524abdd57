//! Disk-backed cache for directions responses.
//!
//! Routes are treated as static for a given mode and endpoint pair, so each
//! distinct [`RouteKey`] is fetched from the API at most once for the
//! lifetime of the routes directory. Entries never expire and are never
//! rewritten.
//!
//! Layout: one JSON file per key, named by [`RouteKey::identifier`].
//! Files are written to a temporary name and moved into place with a
//! no-clobber rename, so readers never see a partial entry and the first
//! writer of a key wins.
//!
//! An in-memory layer sits in front of the directory. Concurrent requests
//! for the same key share a single load-or-fetch.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use moka::future::Cache as MokaCache;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::domain::{GeoPoint, RouteGeometry, RouteKey};
use crate::routing::{RouteError, RouteProvider};

/// Default directory for cached routes.
pub const DEFAULT_ROUTES_DIR: &str = "routes";

/// Persisted form of a cached route.
#[derive(Debug, Serialize, Deserialize)]
struct CachedRoute {
    /// Unix timestamp when the entry was written.
    #[serde(default)]
    cached_at_secs: u64,
    /// Travel mode profile name.
    mode: String,
    /// Route positions as `[lon, lat]`.
    coordinates: Vec<[f64; 2]>,
}

/// Configuration for the route cache.
#[derive(Debug, Clone)]
pub struct RouteCacheConfig {
    /// Directory holding one file per cached route.
    pub routes_dir: PathBuf,

    /// Maximum number of routes kept in memory.
    pub max_in_memory: u64,
}

impl RouteCacheConfig {
    pub fn new(routes_dir: impl Into<PathBuf>) -> Self {
        Self {
            routes_dir: routes_dir.into(),
            max_in_memory: 1000,
        }
    }

    /// Set the in-memory capacity.
    pub fn with_max_in_memory(mut self, n: u64) -> Self {
        self.max_in_memory = n;
        self
    }
}

impl Default for RouteCacheConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ROUTES_DIR)
    }
}

/// Route provider with a persistent cache.
///
/// Wraps a [`RouteProvider`] and stores every successful response on disk.
pub struct RouteCache<P> {
    provider: P,
    routes_dir: PathBuf,
    memory: MokaCache<RouteKey, RouteGeometry>,
}

impl<P: RouteProvider> RouteCache<P> {
    /// Create a new cache in front of `provider`.
    pub fn new(provider: P, config: &RouteCacheConfig) -> Self {
        let memory = MokaCache::builder()
            .max_capacity(config.max_in_memory)
            .build();

        Self {
            provider,
            routes_dir: config.routes_dir.clone(),
            memory,
        }
    }

    /// Return the route for `key`, fetching it only if it was never cached.
    ///
    /// On failure nothing is persisted, so a later call retries the fetch.
    pub async fn get_or_fetch(&self, key: &RouteKey) -> Result<RouteGeometry, RouteError> {
        let key = *key;
        self.memory
            .try_get_with(key, self.load_or_fetch(key))
            .await
            .map_err(|e| (*e).clone())
    }

    async fn load_or_fetch(&self, key: RouteKey) -> Result<RouteGeometry, RouteError> {
        let path = self.entry_path(&key);

        if let Some(geometry) = read_entry(&path)? {
            debug!(%key, "route cache hit");
            return Ok(geometry);
        }

        debug!(%key, "route cache miss");
        let geometry = self.provider.fetch(&key).await?;
        write_entry(&self.routes_dir, &path, &key, &geometry)?;

        Ok(geometry)
    }

    /// Path of the entry file for `key`, whether or not it exists.
    pub fn entry_path(&self, key: &RouteKey) -> PathBuf {
        self.routes_dir.join(format!("{}.json", key.identifier()))
    }

    /// Whether an entry for `key` has been persisted.
    pub fn contains(&self, key: &RouteKey) -> bool {
        self.entry_path(key).is_file()
    }

    /// The cache directory.
    pub fn routes_dir(&self) -> &Path {
        &self.routes_dir
    }

    /// Access the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }
}

/// Read an entry, returning `None` if it does not exist.
fn read_entry(path: &Path) -> Result<Option<RouteGeometry>, RouteError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(RouteError::cache(format!(
                "failed to read {}: {e}",
                path.display()
            )));
        }
    };

    let cached: CachedRoute = serde_json::from_str(&contents).map_err(|e| {
        RouteError::cache(format!("corrupt cache entry {}: {e}", path.display()))
    })?;

    let points = cached
        .coordinates
        .iter()
        .map(|position| GeoPoint::from_lon_lat(position))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| RouteError::cache(format!("corrupt cache entry {}: {e}", path.display())))?;

    Ok(Some(RouteGeometry::new(points)))
}

/// Persist an entry unless one already exists.
fn write_entry(
    dir: &Path,
    path: &Path,
    key: &RouteKey,
    geometry: &RouteGeometry,
) -> Result<(), RouteError> {
    let cached_at_secs = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();

    let cached = CachedRoute {
        cached_at_secs,
        mode: key.mode.as_str().to_string(),
        coordinates: geometry.points().iter().map(GeoPoint::to_lon_lat).collect(),
    };

    std::fs::create_dir_all(dir).map_err(|e| {
        RouteError::cache(format!("failed to create cache directory: {e}"))
    })?;

    let json = serde_json::to_vec(&cached)
        .map_err(|e| RouteError::cache(format!("failed to serialize route: {e}")))?;

    let mut file = NamedTempFile::new_in(dir)
        .map_err(|e| RouteError::cache(format!("failed to create temporary file: {e}")))?;
    file.write_all(&json)
        .map_err(|e| RouteError::cache(format!("failed to write route: {e}")))?;

    match file.persist_noclobber(path) {
        Ok(_) => Ok(()),
        Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => {
            debug!(%key, "route cache entry already written");
            Ok(())
        }
        Err(e) => Err(RouteError::cache(format!(
            "failed to persist {}: {}",
            path.display(),
            e.error
        ))),
    }
}
