//! Teaching assignments and class offerings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{
    AssignmentId, ClassId, CourseId, DepartmentId, OfferingId, SchoolId, TeacherId, TermId,
};

/// How a teaching assignment came to exist.
///
/// The hosted backend stores this as a plain string column; the closed enum
/// keeps the three legal values legal and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentType {
    /// Committed automatically by the generation orchestrator.
    Ai,
    /// Entered by an administrator.
    Manual,
    /// Proposed by the suggestion ranker, awaiting confirmation.
    AiSuggested,
}

impl AssignmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentType::Ai => "ai",
            AssignmentType::Manual => "manual",
            AssignmentType::AiSuggested => "ai_suggested",
        }
    }
}

/// A course taught to a class during a term, with its weekly cadence and
/// optional curriculum hour requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassOffering {
    pub id: OfferingId,
    pub school_id: SchoolId,
    pub course_id: CourseId,
    pub class_id: ClassId,
    pub term_id: TermId,
    pub course_name: String,
    pub class_name: String,
    pub department_id: Option<DepartmentId>,
    pub periods_per_week: u32,
    /// Absent means no explicit requirement; only periods matter.
    pub required_hours_per_term: Option<f64>,
}

/// A teacher bound to a class offering for a term.
///
/// The set of assignments for a teacher within a term determines that
/// teacher's current load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeachingAssignment {
    pub id: AssignmentId,
    pub teacher_id: TeacherId,
    pub offering_id: OfferingId,
    pub term_id: TermId,
    pub periods_per_week: u32,
    pub assignment_type: AssignmentType,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_type_wire_format() {
        assert_eq!(
            serde_json::to_string(&AssignmentType::AiSuggested).unwrap(),
            "\"ai_suggested\""
        );
        let parsed: AssignmentType = serde_json::from_str("\"manual\"").unwrap();
        assert_eq!(parsed, AssignmentType::Manual);
    }

    #[test]
    fn test_assignment_type_as_str_matches_wire() {
        for ty in [
            AssignmentType::Ai,
            AssignmentType::Manual,
            AssignmentType::AiSuggested,
        ] {
            let wire = serde_json::to_string(&ty).unwrap();
            assert_eq!(wire, format!("\"{}\"", ty.as_str()));
        }
    }
}
