//! Generation job repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{GenerationId, TermId};
use crate::models::GenerationJob;

/// Repository trait for generation job lifecycle records.
///
/// The job row must exist before the external solver is contacted so that
/// submission failures stay auditable.
#[async_trait]
pub trait GenerationRepository: Send + Sync {
    /// Persist a fresh job record.
    ///
    /// # Returns
    /// * `Ok(())` - On success
    /// * `Err(RepositoryError::Conflict)` - If a job with the same ID exists
    async fn create_generation_job(&self, job: &GenerationJob) -> RepositoryResult<()>;

    /// Overwrite an existing job record with its latest state.
    ///
    /// # Returns
    /// * `Ok(())` - On success
    /// * `Err(RepositoryError::NotFound)` - If the job was never created
    async fn update_generation_job(&self, job: &GenerationJob) -> RepositoryResult<()>;

    /// Get a job record by ID.
    async fn get_generation_job(&self, id: &GenerationId) -> RepositoryResult<GenerationJob>;

    /// List job records for a term, newest first.
    async fn list_generation_jobs_for_term(
        &self,
        term_id: &TermId,
    ) -> RepositoryResult<Vec<GenerationJob>>;
}
