//! Axum-based HTTP server for the timetabling backend.
//!
//! This module provides the REST API surface: workload insights, teacher
//! suggestions, curriculum validation, and generation job management with
//! SSE progress streaming.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::{ApiError, AppError};
pub use router::create_router;
pub use state::AppState;
