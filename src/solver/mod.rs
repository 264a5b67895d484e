//! Typed port for the external timetable solver service.
//!
//! The actual slot-assignment search runs in a separate service reached
//! over a job-style API: submit a request, poll for status, read the
//! proposed lessons on completion. This module defines the request and
//! response schemas, the error taxonomy, and the [`SolverClient`] trait
//! the orchestrator depends on. Responses are validated at this boundary
//! so the rest of the crate never handles loosely-typed payloads.

pub mod mock;

#[cfg(feature = "solver-http")]
pub mod http;

pub use mock::MockSolver;

#[cfg(feature = "solver-http")]
pub use http::HttpSolver;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::{AssignmentId, ClassId, GenerationId, SchoolId, TeacherId, TermId, TimeSlotId};

/// Scheduling constraints forwarded to the solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConstraints {
    pub respect_teacher_availability: bool,
    pub respect_room_preferences: bool,
    pub distribute_subjects_evenly: bool,
    pub avoid_consecutive_subjects: bool,
    pub respect_break_requirements: bool,
}

impl Default for SolverConstraints {
    fn default() -> Self {
        Self {
            respect_teacher_availability: true,
            respect_room_preferences: true,
            distribute_subjects_evenly: true,
            avoid_consecutive_subjects: true,
            respect_break_requirements: true,
        }
    }
}

/// School block of the solver request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolConfig {
    pub id: SchoolId,
    pub name: String,
    pub constraints: SolverConstraints,
}

/// Requested optimization effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizationLevel {
    Basic,
    Advanced,
}

/// Complete generation request submitted to the solver service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverRequest {
    pub school_config: SchoolConfig,
    pub term_id: TermId,
    #[serde(rename = "timetable_generation_id")]
    pub generation_id: GenerationId,
    pub selected_classes: Vec<ClassId>,
    pub selected_teachers: Vec<TeacherId>,
    pub optimization_level: OptimizationLevel,
    /// Solver time budget in seconds.
    pub time_limit: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub holidays: Vec<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_start: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_end: Option<NaiveDate>,
}

/// Handle returned on successful submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverJob {
    pub job_id: String,
}

/// Solver-side job state.
///
/// The deployed service reports `pending`/`processing`; both spellings are
/// accepted on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverJobStatus {
    #[serde(alias = "pending")]
    Queued,
    #[serde(alias = "processing")]
    Running,
    Completed,
    Failed,
}

/// One proposed lesson placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonProposal {
    pub teaching_assignment_id: AssignmentId,
    pub date: NaiveDate,
    pub timeslot_id: TimeSlotId,
}

/// Placement statistics reported alongside a completed result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolverStatistics {
    pub total_lessons: usize,
    pub scheduled_lessons: usize,
    pub unscheduled_lessons: usize,
    pub teacher_conflicts: usize,
    pub class_conflicts: usize,
}

/// Payload of a completed job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverResultPayload {
    pub lessons: Vec<LessonProposal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<SolverStatistics>,
}

/// Status response for a polled job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverStatusResponse {
    pub status: SolverJobStatus,
    /// 0-100, when the solver reports partial progress.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<SolverResultPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SolverStatusResponse {
    /// A bare running status with the given progress.
    pub fn running(progress: f64, message: impl Into<String>) -> Self {
        Self {
            status: SolverJobStatus::Running,
            progress: Some(progress),
            message: Some(message.into()),
            result: None,
            error: None,
        }
    }

    /// A completed status carrying lesson proposals.
    pub fn completed(lessons: Vec<LessonProposal>) -> Self {
        Self {
            status: SolverJobStatus::Completed,
            progress: Some(100.0),
            message: None,
            result: Some(SolverResultPayload {
                lessons,
                statistics: None,
            }),
            error: None,
        }
    }

    /// A failed status with an error message.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: SolverJobStatus::Failed,
            progress: None,
            message: None,
            result: None,
            error: Some(error.into()),
        }
    }
}

/// Errors from the solver port.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    /// Network-level failure reaching the service. Poll loops retry these
    /// up to their attempt ceiling.
    #[error("Solver transport error: {0}")]
    Transport(String),

    /// The service refused the request outright.
    #[error("Solver rejected request: {0}")]
    Rejected(String),

    /// The service answered with a payload this port cannot interpret.
    #[error("Solver protocol error: {0}")]
    Protocol(String),
}

impl SolverError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, SolverError::Transport(_))
    }
}

/// Client port for the external solver service.
#[async_trait]
pub trait SolverClient: Send + Sync {
    /// Submit a generation request.
    ///
    /// # Returns
    /// * `Ok(SolverJob)` - Handle for polling
    /// * `Err(SolverError)` - Submission is never retried automatically;
    ///   a new generation attempt is a fresh user action
    async fn submit(&self, request: &SolverRequest) -> Result<SolverJob, SolverError>;

    /// Poll the status of a submitted job.
    async fn poll_status(&self, job_id: &str) -> Result<SolverStatusResponse, SolverError>;

    /// Ask the service to abandon a job. Best-effort.
    async fn cancel(&self, job_id: &str) -> Result<(), SolverError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_accepts_legacy_spellings() {
        let parsed: SolverJobStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(parsed, SolverJobStatus::Queued);
        let parsed: SolverJobStatus = serde_json::from_str("\"processing\"").unwrap();
        assert_eq!(parsed, SolverJobStatus::Running);
        let parsed: SolverJobStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, SolverJobStatus::Completed);
    }

    #[test]
    fn test_request_wire_field_names() {
        let request = SolverRequest {
            school_config: SchoolConfig {
                id: SchoolId::new("s-1"),
                name: "Northside".to_string(),
                constraints: SolverConstraints::default(),
            },
            term_id: TermId::new("term-1"),
            generation_id: GenerationId::new("gen-1"),
            selected_classes: vec![ClassId::new("c-1")],
            selected_teachers: vec![TeacherId::new("t-1")],
            optimization_level: OptimizationLevel::Basic,
            time_limit: 300,
            holidays: vec![],
            term_start: None,
            term_end: None,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["timetable_generation_id"], "gen-1");
        assert_eq!(value["optimization_level"], "basic");
        assert!(value.get("holidays").is_none());
    }

    #[test]
    fn test_status_response_parses_result_payload() {
        let raw = r#"{
            "status": "completed",
            "progress": 100,
            "result": {
                "lessons": [
                    {"teaching_assignment_id": "a-1", "date": "2026-03-02", "timeslot_id": "slot-1"}
                ],
                "statistics": {
                    "total_lessons": 1,
                    "scheduled_lessons": 1,
                    "unscheduled_lessons": 0,
                    "teacher_conflicts": 0,
                    "class_conflicts": 0
                }
            }
        }"#;

        let parsed: SolverStatusResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.status, SolverJobStatus::Completed);
        let result = parsed.result.unwrap();
        assert_eq!(result.lessons.len(), 1);
        assert_eq!(result.lessons[0].date, "2026-03-02".parse().unwrap());
    }

    #[test]
    fn test_only_transport_errors_are_retryable() {
        assert!(SolverError::Transport("timeout".into()).is_retryable());
        assert!(!SolverError::Rejected("bad request".into()).is_retryable());
        assert!(!SolverError::Protocol("bad json".into()).is_retryable());
    }
}
