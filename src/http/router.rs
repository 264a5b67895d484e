//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Workload & suggestions
        .route(
            "/schools/{school_id}/terms/{term_id}/workload-insights",
            get(handlers::get_workload_insights),
        )
        .route(
            "/courses/{course_id}/suggestions",
            get(handlers::get_teacher_suggestions),
        )
        .route("/assignments/validate", post(handlers::validate_assignment))
        // Curriculum
        .route("/curriculum/validate", post(handlers::validate_curriculum))
        .route(
            "/schools/{school_id}/curriculum-report",
            get(handlers::get_curriculum_report),
        )
        // Generation jobs
        .route("/generations", post(handlers::create_generation))
        .route("/generations/{generation_id}", get(handlers::get_generation))
        .route(
            "/generations/{generation_id}/cancel",
            post(handlers::cancel_generation),
        )
        .route(
            "/generations/{generation_id}/events",
            get(handlers::stream_generation_events),
        );

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::db::repo_config::SolverSettings;
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::FullRepository;
    use crate::services::generation::GenerationEngine;
    use crate::services::job_tracker::GenerationTracker;
    use crate::solver::MockSolver;

    #[test]
    fn test_router_creation() {
        let repo = Arc::new(LocalRepository::new()) as Arc<dyn FullRepository>;
        let engine = GenerationEngine::new(
            repo.clone(),
            Arc::new(MockSolver::new()),
            GenerationTracker::new(),
            SolverSettings::default(),
        );
        let state = AppState::new(repo, engine);
        let _router = create_router(state);
        // If we got here, router was created successfully
    }
}
