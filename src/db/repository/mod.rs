//! Repository trait definitions for the hosted backend.
//!
//! This module provides a collection of focused repository traits that
//! abstract the persistence layer. By splitting responsibilities across
//! multiple traits, implementations can be more focused and testable.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`teachers`]: Teacher capacity and qualification lookups
//! - [`offerings`]: Class offering and time slot reads
//! - [`assignments`]: Teaching assignment CRUD
//! - [`lessons`]: Scheduled lesson writes with uniqueness enforcement
//! - [`generations`]: Generation job lifecycle records
//!
//! # Convenience Trait Bound
//!
//! For functions that need all repository capabilities, use the
//! [`FullRepository`] trait bound:
//!
//! ```ignore
//! async fn my_service<R: FullRepository>(repo: &R) -> Result<()> {
//!     let capacity = repo.get_teacher_capacity(&teacher_id).await?;
//!     let assignments = repo.assignments_for_teacher(&teacher_id, &term_id).await?;
//!     Ok(())
//! }
//! ```

pub mod assignments;
pub mod error;
pub mod generations;
pub mod lessons;
pub mod offerings;
pub mod teachers;

// Re-export error types
pub use error::{ErrorContext, RepositoryError, RepositoryResult};

// Re-export all traits
pub use assignments::AssignmentRepository;
pub use generations::GenerationRepository;
pub use lessons::LessonRepository;
pub use offerings::OfferingRepository;
pub use teachers::TeacherRepository;

/// Composite trait bound for a complete repository implementation.
///
/// This trait is automatically implemented for any type that implements
/// all five repository traits. Use this as a convenient bound when you
/// need access to all repository operations.
pub trait FullRepository:
    TeacherRepository
    + OfferingRepository
    + AssignmentRepository
    + LessonRepository
    + GenerationRepository
{
}

// Blanket implementation: any type implementing all five traits automatically
// implements FullRepository
impl<T> FullRepository for T where
    T: TeacherRepository
        + OfferingRepository
        + AssignmentRepository
        + LessonRepository
        + GenerationRepository
{
}
