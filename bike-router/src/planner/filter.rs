//! Availability filtering.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use crate::domain::Station;

/// Error returned when parsing an unknown capability.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown capability: {0} (expected bikes, docks or any)")]
pub struct UnknownCapability(String);

/// What the user needs from a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Capability {
    /// At least one bike to pick up
    #[default]
    BikesAvailable,
    /// At least one free dock to return to
    DocksAvailable,
    /// No availability requirement
    Any,
}

impl Capability {
    /// The counter this capability tests.
    ///
    /// `None` means the station has no such counter (or the capability
    /// has no counter at all).
    fn counter(self, station: &Station) -> Option<u32> {
        match self {
            Capability::BikesAvailable => station.availability.bikes_available,
            Capability::DocksAvailable => station.availability.docks_available,
            Capability::Any => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::BikesAvailable => "bikes",
            Capability::DocksAvailable => "docks",
            Capability::Any => "any",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = UnknownCapability;

    /// Accepts the short names as well as the form labels
    /// ("Bikes Available", "Docks Available").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '_', '-'], "");
        match normalized.as_str() {
            "bikes" | "bikesavailable" => Ok(Capability::BikesAvailable),
            "docks" | "docksavailable" => Ok(Capability::DocksAvailable),
            "any" | "none" => Ok(Capability::Any),
            _ => Err(UnknownCapability(s.to_string())),
        }
    }
}

/// Keep the stations that satisfy `capability`, in their original order.
///
/// If no station in the input carries the requested counter at all, the
/// feed does not publish it and the input is returned unfiltered. Otherwise
/// only stations whose counter is present and strictly positive are kept.
pub fn filter_available(stations: &[Arc<Station>], capability: Capability) -> Vec<Arc<Station>> {
    if capability == Capability::Any {
        return stations.to_vec();
    }

    let applicable = stations.iter().any(|s| capability.counter(s).is_some());
    if !applicable {
        debug!(%capability, "no station reports this counter; filter not applicable");
        return stations.to_vec();
    }

    stations
        .iter()
        .filter(|s| capability.counter(s).is_some_and(|n| n > 0))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Availability, GeoPoint};

    fn station(name: &str, bikes: Option<u32>, docks: Option<u32>) -> Arc<Station> {
        let availability = Availability {
            bikes_available: bikes,
            docks_available: docks,
        };
        Arc::new(Station::new(
            name,
            GeoPoint::new(-118.25, 34.05).unwrap(),
            availability,
        ))
    }

    fn names(stations: &[Arc<Station>]) -> Vec<&str> {
        stations.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn keeps_positive_counters_in_order() {
        let stations = vec![
            station("A", Some(0), Some(5)),
            station("B", Some(3), Some(0)),
            station("C", Some(5), Some(2)),
        ];

        let bikes = filter_available(&stations, Capability::BikesAvailable);
        assert_eq!(names(&bikes), vec!["B", "C"]);

        let docks = filter_available(&stations, Capability::DocksAvailable);
        assert_eq!(names(&docks), vec!["A", "C"]);
    }

    #[test]
    fn missing_counter_everywhere_is_not_applicable() {
        let stations = vec![station("A", None, Some(1)), station("B", None, Some(0))];

        let bikes = filter_available(&stations, Capability::BikesAvailable);
        assert_eq!(names(&bikes), vec!["A", "B"]);
    }

    #[test]
    fn missing_counter_on_some_stations_excludes_them() {
        let stations = vec![station("A", None, None), station("B", Some(2), None)];

        let bikes = filter_available(&stations, Capability::BikesAvailable);
        assert_eq!(names(&bikes), vec!["B"]);
    }

    #[test]
    fn any_keeps_everything() {
        let stations = vec![station("A", Some(0), Some(0)), station("B", None, None)];
        assert_eq!(filter_available(&stations, Capability::Any).len(), 2);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(filter_available(&[], Capability::BikesAvailable).is_empty());
    }

    #[test]
    fn filtering_shares_stations() {
        let stations = vec![station("A", Some(1), Some(1))];
        let filtered = filter_available(&stations, Capability::BikesAvailable);
        assert!(Arc::ptr_eq(&stations[0], &filtered[0]));
    }

    #[test]
    fn parse_capability() {
        assert_eq!("bikes".parse::<Capability>().unwrap(), Capability::BikesAvailable);
        assert_eq!(
            "Bikes Available".parse::<Capability>().unwrap(),
            Capability::BikesAvailable
        );
        assert_eq!(
            "docks_available".parse::<Capability>().unwrap(),
            Capability::DocksAvailable
        );
        assert_eq!("ANY".parse::<Capability>().unwrap(), Capability::Any);
        assert!("route".parse::<Capability>().is_err());
        assert!("".parse::<Capability>().is_err());
        assert!("  ".parse::<Capability>().is_err());
    }
}
