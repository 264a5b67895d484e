//! Data Transfer Objects for the HTTP API.
//!
//! These DTOs are used for request/response serialization in the REST API.
//! Report types produced by the service layer already derive
//! Serialize/Deserialize and are re-exported here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// Re-export existing DTOs that are already serializable
pub use crate::api::{
    AssignmentValidation, CurriculumCheck, CurriculumConsistencyRow, CurriculumStatus,
    GenerationEvent, GenerationJob, TeacherSuggestion, WorkloadSnapshot, WorkloadStatus,
};
pub use crate::db::services::TeacherWorkloadInsight;

use crate::solver::{OptimizationLevel, SolverConstraints};

/// Request body for starting a generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGenerationRequest {
    pub school_id: String,
    pub school_name: String,
    pub term_id: String,
    pub selected_classes: Vec<String>,
    pub selected_teachers: Vec<String>,
    #[serde(default)]
    pub constraints: SolverConstraints,
    #[serde(default = "default_optimization_level")]
    pub optimization_level: OptimizationLevel,
    /// Solver time budget in seconds (default: 300)
    #[serde(default = "default_time_limit")]
    pub time_limit: u64,
    #[serde(default)]
    pub term_start: Option<NaiveDate>,
    #[serde(default)]
    pub term_end: Option<NaiveDate>,
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,
}

fn default_optimization_level() -> OptimizationLevel {
    OptimizationLevel::Basic
}

fn default_time_limit() -> u64 {
    300
}

/// Response for generation creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGenerationResponse {
    /// Job ID for tracking the generation
    pub generation_id: String,
    /// Message about the operation
    pub message: String,
}

/// Generation status response: the job record plus its event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationStatusResponse {
    #[serde(flatten)]
    pub job: GenerationJob,
    pub events: Vec<GenerationEvent>,
}

/// Response for a cancellation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelGenerationResponse {
    pub generation_id: String,
    pub cancelled: bool,
}

/// Request body for interactive curriculum validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurriculumValidateRequest {
    pub periods_per_week: u32,
    #[serde(default)]
    pub required_hours_per_term: Option<f64>,
    #[serde(default = "default_period_duration")]
    pub period_duration_minutes: f64,
    #[serde(default = "default_weeks_per_term")]
    pub weeks_per_term: f64,
}

fn default_period_duration() -> f64 {
    crate::services::curriculum::DEFAULT_PERIOD_DURATION_MINUTES
}

fn default_weeks_per_term() -> f64 {
    crate::services::curriculum::DEFAULT_WEEKS_PER_TERM
}

/// Request body for pre-assignment validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateAssignmentRequest {
    pub teacher_id: String,
    pub offering_id: String,
}

/// Query parameters for the suggestions endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionsQuery {
    pub term_id: String,
    /// Department partial-match constant (default: 0.8)
    #[serde(default)]
    pub partial_match: Option<f64>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Backend connection status
    pub database: String,
}
