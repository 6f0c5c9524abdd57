//! Planner error types.

use crate::domain::InvalidCoordinate;
use crate::routing::RouteError;
use crate::stations::StationError;

/// Errors from station queries and route planning.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlanError {
    /// Query point outside the geodetic range
    #[error(transparent)]
    InvalidCoordinate(#[from] InvalidCoordinate),

    /// Malformed request (e.g. asking for zero stations)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Station data missing, unreadable, or without a qualifying station
    #[error("no data available: {0}")]
    LoadFailure(String),

    /// A route leg could not be fetched
    #[error(transparent)]
    Route(#[from] RouteError),
}

impl From<StationError> for PlanError {
    fn from(err: StationError) -> Self {
        PlanError::LoadFailure(err.to_string())
    }
}
