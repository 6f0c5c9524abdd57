//! Nearest-station queries over the current snapshot.

use std::sync::Arc;

use tracing::debug;

use crate::domain::{GeoPoint, Station};
use crate::projection::Projector;
use crate::stations::StationRepository;

use super::error::PlanError;
use super::filter::{Capability, filter_available};
use super::rank::{RankedStation, rank_nearest};

/// Finds the stations nearest to a point.
///
/// Each query reads the snapshot once, filters it by availability,
/// projects stations and query point with the same projector, and ranks.
#[derive(Debug, Clone)]
pub struct StationFinder {
    repository: StationRepository,
    projector: Projector,
}

impl StationFinder {
    pub fn new(repository: StationRepository, projector: Projector) -> Self {
        Self {
            repository,
            projector,
        }
    }

    /// Load the current snapshot.
    pub fn load(&self) -> Result<Vec<Arc<Station>>, PlanError> {
        Ok(self.repository.load()?)
    }

    /// The `k` qualifying stations nearest to `point`, nearest first.
    pub fn find_nearest(
        &self,
        point: &GeoPoint,
        capability: Capability,
        k: usize,
    ) -> Result<Vec<RankedStation>, PlanError> {
        if k == 0 {
            return Err(PlanError::InvalidArgument(
                "number of stations must be at least 1".to_string(),
            ));
        }

        let stations = self.load()?;
        self.nearest_in(&stations, point, capability, k)
    }

    /// Like [`find_nearest`](Self::find_nearest), over an already loaded
    /// snapshot.
    pub fn nearest_in(
        &self,
        stations: &[Arc<Station>],
        point: &GeoPoint,
        capability: Capability,
        k: usize,
    ) -> Result<Vec<RankedStation>, PlanError> {
        let qualifying = filter_available(stations, capability);

        let projected = self
            .projector
            .batch_to_planar(qualifying.iter().map(|s| &s.location));
        let query = self.projector.to_planar(point);

        let candidates: Vec<_> = qualifying.into_iter().zip(projected).collect();
        let ranked = rank_nearest(&query, &candidates, k)?;

        debug!(
            %point,
            %capability,
            total = stations.len(),
            qualifying = candidates.len(),
            returned = ranked.len(),
            "ranked nearest stations"
        );
        Ok(ranked)
    }
}
