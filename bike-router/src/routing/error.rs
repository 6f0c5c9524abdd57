//! Routing error types.

/// Errors from fetching or caching a route.
///
/// Payloads are strings so the error can be cloned to every caller waiting
/// on the same in-flight request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// The directions API is throttling us (HTTP 429)
    #[error("rate limited by routing API")]
    RateLimited,

    /// Any other API or transport failure, including timeouts
    #[error("routing unavailable: {message}")]
    RoutingUnavailable {
        /// HTTP status, if a response was received
        status: Option<u16>,
        message: String,
    },

    /// Reading or writing the on-disk route cache failed
    #[error("route cache error: {message}")]
    Cache { message: String },
}

impl RouteError {
    pub(crate) fn unavailable(message: impl Into<String>) -> Self {
        RouteError::RoutingUnavailable {
            status: None,
            message: message.into(),
        }
    }

    pub(crate) fn cache(message: impl Into<String>) -> Self {
        RouteError::Cache {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for RouteError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key as a query parameter
        let err = err.without_url();
        let message = if err.is_timeout() {
            format!("request timed out: {err}")
        } else {
            err.to_string()
        };
        RouteError::RoutingUnavailable {
            status: err.status().map(|s| s.as_u16()),
            message,
        }
    }
}
