//! Class offering and time slot repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{OfferingId, SchoolId};
use crate::models::{ClassOffering, TimeSlot};

/// Repository trait for class offering metadata and the school's time
/// slot grid. Read-only from the scheduling core's point of view: both
/// are maintained by the surrounding administration screens.
#[async_trait]
pub trait OfferingRepository: Send + Sync {
    /// Get a single class offering by ID.
    ///
    /// # Returns
    /// * `Ok(ClassOffering)` - Offering with cadence and requirement fields
    /// * `Err(RepositoryError::NotFound)` - If the offering doesn't exist
    async fn get_offering(&self, offering_id: &OfferingId) -> RepositoryResult<ClassOffering>;

    /// List all offerings for a school, across terms. Used by the
    /// curriculum consistency report.
    async fn list_offerings_for_school(
        &self,
        school_id: &SchoolId,
    ) -> RepositoryResult<Vec<ClassOffering>>;

    /// List the school's time slots, teaching and non-teaching.
    async fn list_time_slots(&self, school_id: &SchoolId) -> RepositoryResult<Vec<TimeSlot>>;
}
