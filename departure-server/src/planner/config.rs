//! Search configuration for the departure planner.

/// Number of departures returned by a successful search.
pub const MAX_DEPARTURES: usize = 5;

/// Configuration parameters for departure search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum number of "did you mean" names offered when a stop or
    /// route does not resolve.
    pub max_suggestions: usize,
}

impl SearchConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(max_suggestions: usize) -> Self {
        Self { max_suggestions }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { max_suggestions: 5 }
    }
}
