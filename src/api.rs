//! Public API surface for the backend.
//!
//! This file consolidates the identifier newtypes and re-exports the DTO
//! types produced by the service layer. All types derive
//! Serialize/Deserialize for JSON serialization.

pub use crate::models::{
    AssignmentType, ClassOffering, GenerationJob, GenerationStatus, QualifiedTeacher,
    ScheduledLesson, TeacherCapacity, TeachingAssignment, TimeSlot,
};
pub use crate::services::assignment::AssignmentValidation;
pub use crate::services::curriculum::{
    CurriculumCheck, CurriculumConsistencyRow, CurriculumStatus,
};
pub use crate::services::job_tracker::{GenerationEvent, GenerationEventLevel};
pub use crate::services::suggestions::TeacherSuggestion;
pub use crate::services::workload::{WorkloadSnapshot, WorkloadStatus};

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                $name(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                $name(value.to_string())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

string_id!(
    /// School identifier (hosted backend primary key).
    SchoolId
);
string_id!(
    /// Teacher identifier.
    TeacherId
);
string_id!(
    /// Course identifier.
    CourseId
);
string_id!(
    /// Class (section) identifier.
    ClassId
);
string_id!(
    /// Term identifier.
    TermId
);
string_id!(
    /// Department identifier.
    DepartmentId
);
string_id!(
    /// Class offering identifier (course taught to a class during a term).
    OfferingId
);
string_id!(
    /// Teaching assignment identifier.
    AssignmentId
);
string_id!(
    /// Time slot identifier.
    TimeSlotId
);

/// Generation job identifier, minted locally for each orchestrator run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenerationId(pub String);

impl GenerationId {
    /// Mint a fresh random identifier.
    pub fn random() -> Self {
        GenerationId(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(value: impl Into<String>) -> Self {
        GenerationId(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GenerationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
