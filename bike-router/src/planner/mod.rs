//! Station search and bike route planning.
//!
//! Answers two questions: "which stations near here have a bike (or a free
//! dock)?" and "how do I get from A to B by walking to a bike, riding it,
//! and walking the rest?"
//!
//! Station distances are straight-line distances in Web Mercator metres.
//! Only the route legs use the road network, via the directions API.

mod config;
mod error;
mod filter;
mod finder;
mod rank;
mod route;

pub use config::PlannerConfig;
pub use error::PlanError;
pub use filter::{Capability, UnknownCapability, filter_available};
pub use finder::StationFinder;
pub use rank::{RankedStation, rank_nearest};
pub use route::{BikeRoute, RouteLeg, RoutePlanner};
