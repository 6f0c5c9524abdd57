//! Nearest-station ranking.
//!
//! Distances are straight-line planar distances between projected points,
//! not walking distances.

use std::sync::Arc;

use crate::domain::Station;
use crate::projection::ProjectedPoint;

use super::error::PlanError;

/// A station with its distance from a query point.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedStation {
    pub station: Arc<Station>,
    /// Planar distance in projected metres
    pub distance_m: f64,
}

/// Return the `k` candidates nearest to `query`, nearest first.
///
/// Ordering is by (distance, position in `candidates`), so equal distances
/// keep load order and repeated calls give identical output. Returns
/// `min(k, candidates.len())` stations; `k == 0` is an `InvalidArgument`.
pub fn rank_nearest(
    query: &ProjectedPoint,
    candidates: &[(Arc<Station>, ProjectedPoint)],
    k: usize,
) -> Result<Vec<RankedStation>, PlanError> {
    if k == 0 {
        return Err(PlanError::InvalidArgument(
            "number of stations must be at least 1".to_string(),
        ));
    }

    let mut scored: Vec<(usize, f64)> = candidates
        .iter()
        .enumerate()
        .map(|(idx, (_, point))| (idx, query.distance_to(point)))
        .collect();

    scored.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
    scored.truncate(k);

    Ok(scored
        .into_iter()
        .map(|(idx, distance_m)| RankedStation {
            station: Arc::clone(&candidates[idx].0),
            distance_m,
        })
        .collect())
}
