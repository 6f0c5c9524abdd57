//! Station data error types.

use std::path::PathBuf;

/// Errors from loading or refreshing the station snapshot.
#[derive(Debug, thiserror::Error)]
pub enum StationError {
    /// Snapshot missing, unreadable or not a feature collection
    #[error("failed to load station snapshot {}: {message}", path.display())]
    LoadFailure { path: PathBuf, message: String },

    /// HTTP request to the live feed failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Live feed returned an error status
    #[error("feed error {status}: {message}")]
    Api { status: u16, message: String },

    /// Live feed body was not a station feature collection
    #[error("feed parse error: {message}")]
    Parse { message: String },

    /// Writing the refreshed snapshot failed
    #[error("snapshot write error: {message}")]
    Write { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StationError::LoadFailure {
            path: PathBuf::from("stations/stations.json"),
            message: "No such file or directory".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to load station snapshot stations/stations.json: No such file or directory"
        );

        let err = StationError::Api {
            status: 503,
            message: "Service Unavailable".into(),
        };
        assert_eq!(err.to_string(), "feed error 503: Service Unavailable");
    }
}
