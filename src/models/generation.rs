//! Generation job lifecycle records and scheduled lessons.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{AssignmentId, GenerationId, TermId, TimeSlotId};

/// Lifecycle state of a generation job.
///
/// Transitions are driven only by the orchestrator: `Idle` exists before a
/// job record is persisted, `Generating` while the external solver runs,
/// and `Completed`/`Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    Idle,
    Generating,
    Completed,
    Failed,
}

impl GenerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationStatus::Idle => "idle",
            GenerationStatus::Generating => "generating",
            GenerationStatus::Completed => "completed",
            GenerationStatus::Failed => "failed",
        }
    }

    /// Terminal states accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GenerationStatus::Completed | GenerationStatus::Failed)
    }
}

/// One invocation of the external timetable solver and its lifecycle record.
///
/// A `Completed` job may still carry a non-empty `errors` list when some
/// individual lessons could not be scheduled (partial success). Only
/// submission or solver-level failure produces `Failed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationJob {
    pub id: GenerationId,
    pub term_id: TermId,
    pub status: GenerationStatus,
    /// 0-100.
    pub progress: u8,
    pub current_step: String,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Identifier assigned by the external solver, once submitted.
    pub solver_job_id: Option<String>,
    pub lessons_requested: usize,
    pub lessons_scheduled: usize,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl GenerationJob {
    /// Fresh job record in the `Generating` state, progress zero.
    pub fn new(id: GenerationId, term_id: TermId) -> Self {
        Self {
            id,
            term_id,
            status: GenerationStatus::Generating,
            progress: 0,
            current_step: String::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
            solver_job_id: None,
            lessons_requested: 0,
            lessons_scheduled: 0,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Completed with dropped lessons, as opposed to full success.
    pub fn is_partial_success(&self) -> bool {
        self.status == GenerationStatus::Completed && !self.errors.is_empty()
    }
}

/// One concrete (assignment, date, timeslot) occurrence produced by a
/// completed generation.
///
/// Created exclusively by the orchestrator during reconciliation; never by
/// a direct user action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledLesson {
    pub assignment_id: AssignmentId,
    pub date: NaiveDate,
    pub timeslot_id: TimeSlotId,
    pub generation_id: GenerationId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&GenerationStatus::Generating).unwrap(),
            "\"generating\""
        );
    }

    #[test]
    fn test_terminal_states() {
        assert!(!GenerationStatus::Idle.is_terminal());
        assert!(!GenerationStatus::Generating.is_terminal());
        assert!(GenerationStatus::Completed.is_terminal());
        assert!(GenerationStatus::Failed.is_terminal());
    }

    #[test]
    fn test_partial_success() {
        let mut job = GenerationJob::new(GenerationId::random(), TermId::new("term-1"));
        assert!(!job.is_partial_success());

        job.status = GenerationStatus::Completed;
        assert!(!job.is_partial_success());

        job.errors.push("conflict".to_string());
        assert!(job.is_partial_success());
    }
}
