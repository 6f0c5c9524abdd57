//! Query limits for station search.

/// Configuration for nearest-station queries.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Number of stations returned when the caller does not say.
    pub default_results: usize,

    /// Upper bound on the number of stations a caller may request.
    pub max_results: usize,
}

impl PlannerConfig {
    pub fn new(default_results: usize, max_results: usize) -> Self {
        Self {
            default_results,
            max_results,
        }
    }

    /// Resolve a requested count against the defaults and cap.
    ///
    /// Zero is passed through so the ranker can reject it.
    pub fn result_count(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_results)
            .min(self.max_results)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_results: 5,
            max_results: 50,
        }
    }
}
