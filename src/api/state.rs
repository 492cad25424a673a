use std::sync::Arc;

use crate::engine::RecommenderEngine;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RecommenderEngine>,
    /// Used when a recommendation request omits `n`
    pub default_recommendations: usize,
}

impl AppState {
    pub fn new(engine: Arc<RecommenderEngine>, default_recommendations: usize) -> Self {
        Self {
            engine,
            default_recommendations,
        }
    }

    pub fn count(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default_recommendations)
    }
}
