//! Teacher repository trait for capacity and qualification lookups.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{CourseId, SchoolId, TeacherId};
use crate::models::{QualifiedTeacher, TeacherCapacity};

/// Repository trait for teacher capacity configuration and
/// department-based qualification lookups.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait TeacherRepository: Send + Sync {
    // ==================== Health & Connection ====================

    /// Check if the backend connection is healthy.
    ///
    /// # Returns
    /// - `Ok(true)` if connection is healthy
    /// - `Ok(false)` if connection is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Teacher Operations ====================

    /// Get capacity configuration for a single teacher.
    ///
    /// # Returns
    /// * `Ok(TeacherCapacity)` - Capacity limits and department
    /// * `Err(RepositoryError::NotFound)` - If the teacher doesn't exist
    async fn get_teacher_capacity(
        &self,
        teacher_id: &TeacherId,
    ) -> RepositoryResult<TeacherCapacity>;

    /// List active teachers for a school.
    async fn list_active_teachers(
        &self,
        school_id: &SchoolId,
    ) -> RepositoryResult<Vec<TeacherCapacity>>;

    /// Resolve the teachers qualified to teach a course through department
    /// membership, flagging primary-department members.
    async fn get_qualified_teachers(
        &self,
        course_id: &CourseId,
    ) -> RepositoryResult<Vec<QualifiedTeacher>>;
}
