//! Live station feed client.
//!
//! Downloads the current inventory from the bike-share operator and
//! replaces the local snapshot that [`StationRepository`] reads.
//!
//! [`StationRepository`]: super::StationRepository

use std::io::Write;
use std::path::PathBuf;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tempfile::NamedTempFile;
use tracing::info;

use super::error::StationError;
use super::repository::{DEFAULT_SNAPSHOT_PATH, parse_snapshot};

/// Default station feed (Metro Bike Share, Los Angeles).
const DEFAULT_FEED_URL: &str = "https://bikeshare.metro.net/stations/json/";

/// The feed rejects requests without a browser-like user agent.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Configuration for the station feed client.
#[derive(Debug, Clone)]
pub struct StationFeedConfig {
    /// URL of the live GeoJSON feed
    pub url: String,
    /// Where the snapshot is written
    pub snapshot_path: PathBuf,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl StationFeedConfig {
    /// Create a config with the default feed URL.
    pub fn new(snapshot_path: impl Into<PathBuf>) -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            snapshot_path: snapshot_path.into(),
            timeout_secs: 30,
        }
    }

    /// Set a custom feed URL (for testing).
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for StationFeedConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SNAPSHOT_PATH)
    }
}

/// A validated feed download.
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    /// Raw GeoJSON body, written to disk unchanged
    pub body: String,
    /// Number of usable stations in the body
    pub station_count: usize,
}

/// Client for the live station feed.
#[derive(Debug, Clone)]
pub struct StationFeedClient {
    http: reqwest::Client,
    url: String,
    snapshot_path: PathBuf,
}

impl StationFeedClient {
    pub fn new(config: StationFeedConfig) -> Result<Self, StationError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: config.url,
            snapshot_path: config.snapshot_path,
        })
    }

    /// Fetch the feed body, checking that it parses as a station collection.
    pub async fn fetch_snapshot(&self) -> Result<FeedSnapshot, StationError> {
        let response = self.http.get(&self.url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StationError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let station_count = parse_snapshot(&body)
            .map_err(|message| StationError::Parse { message })?
            .len();

        Ok(FeedSnapshot {
            body,
            station_count,
        })
    }

    /// Download the feed and replace the snapshot on disk.
    ///
    /// Returns the number of stations written. On failure the existing
    /// snapshot is left untouched.
    pub async fn refresh(&self) -> Result<usize, StationError> {
        let snapshot = self.fetch_snapshot().await?;
        write_snapshot(&self.snapshot_path, &snapshot.body)?;

        info!(
            path = %self.snapshot_path.display(),
            count = snapshot.station_count,
            "refreshed station snapshot"
        );
        Ok(snapshot.station_count)
    }
}

/// Atomically replace the snapshot file.
///
/// Readers see either the old snapshot or the new one, never a partial write.
fn write_snapshot(path: &std::path::Path, body: &str) -> Result<(), StationError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => std::path::Path::new("."),
    };

    std::fs::create_dir_all(parent).map_err(|e| StationError::Write {
        message: format!("failed to create snapshot directory: {e}"),
    })?;

    let mut file = NamedTempFile::new_in(parent).map_err(|e| StationError::Write {
        message: format!("failed to create temporary file: {e}"),
    })?;
    file.write_all(body.as_bytes())
        .map_err(|e| StationError::Write {
            message: format!("failed to write snapshot: {e}"),
        })?;
    file.persist(path).map_err(|e| StationError::Write {
        message: format!("failed to replace snapshot: {}", e.error),
    })?;

    Ok(())
}
