//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::FullRepository;
use crate::services::generation::GenerationEngine;
use crate::services::job_tracker::GenerationTracker;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for backend operations
    pub repository: Arc<dyn FullRepository>,
    /// Generation orchestrator
    pub engine: GenerationEngine,
}

impl AppState {
    /// Create a new application state.
    pub fn new(repository: Arc<dyn FullRepository>, engine: GenerationEngine) -> Self {
        Self { repository, engine }
    }

    /// The tracker observed by the progress endpoints.
    pub fn tracker(&self) -> &GenerationTracker {
        self.engine.tracker()
    }
}
