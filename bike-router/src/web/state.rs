//! Application state for the web layer.

use std::sync::Arc;

use crate::planner::{PlannerConfig, RoutePlanner, StationFinder};
use crate::routing::RoutingClient;

/// Shared application state.
///
/// Generic over the route provider so handlers can be tested without the
/// network.
pub struct AppState<P = RoutingClient> {
    /// Nearest-station queries
    pub finder: Arc<StationFinder>,

    /// Three-leg route planning
    pub planner: Arc<RoutePlanner<P>>,

    /// Query limits
    pub config: Arc<PlannerConfig>,
}

impl<P> AppState<P> {
    /// Create a new app state.
    pub fn new(finder: StationFinder, planner: RoutePlanner<P>, config: PlannerConfig) -> Self {
        Self {
            finder: Arc::new(finder),
            planner: Arc::new(planner),
            config: Arc::new(config),
        }
    }
}

// Derived Clone would require `P: Clone`
impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            finder: Arc::clone(&self.finder),
            planner: Arc::clone(&self.planner),
            config: Arc::clone(&self.config),
        }
    }
}
