//! Bike-share route planner.
//!
//! Answers: "which docking stations near me have a bike (or a free dock),
//! and how do I walk to one, ride, and walk the rest of the way?"
//!
//! Station search is local, over a GeoJSON snapshot of the live feed. Route
//! legs come from OpenRouteService through a disk-backed cache, since the
//! free API tier is rate limited.

pub mod cache;
pub mod domain;
pub mod planner;
pub mod projection;
pub mod routing;
pub mod stations;
pub mod web;
