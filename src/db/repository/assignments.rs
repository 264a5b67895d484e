//! Teaching assignment repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{AssignmentId, TeacherId, TermId};
use crate::models::TeachingAssignment;

/// Repository trait for teaching assignment rows.
///
/// The set of active assignments for a (teacher, term) pair determines
/// that teacher's current load.
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// List active assignments for a teacher within a term.
    async fn assignments_for_teacher(
        &self,
        teacher_id: &TeacherId,
        term_id: &TermId,
    ) -> RepositoryResult<Vec<TeachingAssignment>>;

    /// Create a new assignment row.
    ///
    /// # Returns
    /// * `Ok(())` - On success
    /// * `Err(RepositoryError::Conflict)` - If an assignment with the same
    ///   ID already exists
    async fn create_assignment(&self, assignment: &TeachingAssignment) -> RepositoryResult<()>;

    /// Delete an assignment row (administrative removal or generation
    /// rollback).
    ///
    /// # Returns
    /// * `Ok(())` - On success
    /// * `Err(RepositoryError::NotFound)` - If the assignment doesn't exist
    async fn delete_assignment(&self, assignment_id: &AssignmentId) -> RepositoryResult<()>;
}
