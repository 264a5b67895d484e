//! Classtime HTTP Server Binary
//!
//! This is the main entry point for the timetabling REST API server.
//! It initializes the repository and solver client, sets up the HTTP
//! router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! # Run with the local (in-memory) repository (default)
//! cargo run --bin classtime-server
//!
//! # Point at a deployed solver service
//! SOLVER_BASE_URL=http://solver.internal:8000 \
//!   cargo run --bin classtime-server --features solver-http
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `REPOSITORY_TYPE`: Repository backend (default: local)
//! - `SOLVER_BASE_URL`: Solver service URL (with the solver-http feature)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use classtime::db::{self, BackendConfig};
use classtime::http::{create_router, AppState};
use classtime::services::generation::GenerationEngine;
use classtime::services::job_tracker::GenerationTracker;
use classtime::solver::SolverClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .init();

    info!("Starting classtime HTTP server");

    // Solver and generation settings come from classtime.toml when present.
    let config = BackendConfig::from_default_location().ok();
    let solver_settings = config.map(|c| c.solver).unwrap_or_default();

    // Initialize global repository once and reuse it across the app
    db::init_repository().map_err(|e| anyhow::anyhow!(e))?;
    let repository = Arc::clone(db::get_repository().map_err(|e| anyhow::anyhow!(e))?);
    info!("Repository initialized successfully");

    let solver = build_solver(&solver_settings);
    let engine = GenerationEngine::new(
        repository.clone(),
        solver,
        GenerationTracker::new(),
        solver_settings,
    );

    // Create application state and router
    let state = AppState::new(repository, engine);
    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(feature = "solver-http")]
fn build_solver(settings: &classtime::db::repo_config::SolverSettings) -> Arc<dyn SolverClient> {
    let base_url = env::var("SOLVER_BASE_URL").unwrap_or_else(|_| settings.base_url.clone());
    info!("Using HTTP solver at {}", base_url);
    Arc::new(classtime::solver::HttpSolver::new(base_url))
}

#[cfg(not(feature = "solver-http"))]
fn build_solver(_settings: &classtime::db::repo_config::SolverSettings) -> Arc<dyn SolverClient> {
    info!("Using in-process mock solver (enable the solver-http feature for a real one)");
    Arc::new(classtime::solver::MockSolver::new())
}
