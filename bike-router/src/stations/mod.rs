//! Bike-share station inventory.
//!
//! The inventory lives in a local GeoJSON snapshot. [`StationRepository`]
//! reads it for every query; [`StationFeedClient`] can replace it with a
//! fresh download from the operator's live feed.

mod error;
mod feed;
mod repository;

pub use error::StationError;
pub use feed::{FeedSnapshot, StationFeedClient, StationFeedConfig};
pub use repository::{DEFAULT_SNAPSHOT_PATH, StationRepository};
