//! Bike-share station types.

use super::GeoPoint;

/// Live availability counters for a station.
///
/// Either counter may be absent: not every feed publishes both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Availability {
    pub bikes_available: Option<u32>,
    pub docks_available: Option<u32>,
}

impl Availability {
    /// Availability with both counters present.
    pub fn new(bikes_available: u32, docks_available: u32) -> Self {
        Self {
            bikes_available: Some(bikes_available),
            docks_available: Some(docks_available),
        }
    }
}

/// A bike-share station as loaded from a snapshot.
///
/// Stations are shared behind `Arc` and never mutated once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    /// Kiosk identifier from the feed, if present.
    pub kiosk_id: Option<u64>,
    pub name: String,
    pub address: Option<String>,
    pub location: GeoPoint,
    pub availability: Availability,
}

impl Station {
    /// Create a station with no kiosk id or address.
    pub fn new(name: impl Into<String>, location: GeoPoint, availability: Availability) -> Self {
        Self {
            kiosk_id: None,
            name: name.into(),
            address: None,
            location,
            availability,
        }
    }

    /// Set the street address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Set the kiosk identifier.
    pub fn with_kiosk_id(mut self, kiosk_id: u64) -> Self {
        self.kiosk_id = Some(kiosk_id);
        self
    }
}
