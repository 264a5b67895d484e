//! Scheduled lesson repository trait.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::RepositoryResult;
use crate::api::{GenerationId, TeacherId};
use crate::models::ScheduledLesson;

/// Repository trait for scheduled lesson rows.
///
/// The implementation, not the orchestrator, is responsible for
/// serializing concurrent inserts on the same key: at most one lesson per
/// (assignment, date, timeslot) and per (teacher, date, timeslot).
#[async_trait]
pub trait LessonRepository: Send + Sync {
    /// Insert a scheduled lesson.
    ///
    /// # Returns
    /// * `Ok(())` - On success
    /// * `Err(RepositoryError::Conflict)` - If the uniqueness constraint
    ///   rejects the row. Callers treat this as an expected, recoverable
    ///   per-lesson outcome.
    async fn insert_scheduled_lesson(&self, lesson: &ScheduledLesson) -> RepositoryResult<()>;

    /// List lessons committed by a generation run, in insertion order.
    async fn lessons_for_generation(
        &self,
        generation_id: &GenerationId,
    ) -> RepositoryResult<Vec<ScheduledLesson>>;

    /// List a teacher's lessons on a given date. Used by pre-assignment
    /// conflict checks.
    async fn lessons_for_teacher_on(
        &self,
        teacher_id: &TeacherId,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<ScheduledLesson>>;
}
