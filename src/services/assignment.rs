//! Pre-assignment validation.
//!
//! Checks run before a teacher is committed to a class offering:
//! qualification through department membership, workload headroom, and
//! duplicate-booking conflicts. These are expected business-rule outcomes,
//! so the result is a structured report rather than an error.

use serde::{Deserialize, Serialize};

use crate::api::TeacherId;
use crate::models::QualifiedTeacher;
use crate::services::workload::{WorkloadSnapshot, WorkloadStatus};

/// Structured outcome of a pre-assignment check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentValidation {
    pub is_valid: bool,
    /// Rule violations that block the assignment.
    pub errors: Vec<String>,
    /// Advisories that do not block the assignment.
    pub warnings: Vec<String>,
    pub is_qualified: bool,
    pub is_primary_department: bool,
}

/// Validate a prospective (teacher, offering) assignment.
///
/// # Arguments
/// * `teacher_id` - The candidate teacher
/// * `qualified` - Teachers qualified for the offering's course
/// * `workload` - The candidate's current term snapshot
/// * `conflict_count` - Existing offerings that would double-book the
///   teacher, as counted by the caller
pub fn validate_teacher_assignment(
    teacher_id: &TeacherId,
    qualified: &[QualifiedTeacher],
    workload: &WorkloadSnapshot,
    conflict_count: usize,
) -> AssignmentValidation {
    let qualification = qualified.iter().find(|q| &q.teacher_id == teacher_id);
    let is_qualified = qualification.is_some();
    let is_primary_department = qualification
        .map(|q| q.is_primary_department)
        .unwrap_or(false);

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if !is_qualified {
        errors.push("Teacher is not qualified for this course".to_string());
    }
    if workload.workload_status == WorkloadStatus::Overloaded {
        errors.push("Teacher is already overloaded".to_string());
    }
    if conflict_count > 0 {
        errors.push(format!("{} potential conflicts detected", conflict_count));
    }

    if workload.workload_status == WorkloadStatus::High {
        warnings.push("Teacher has high workload".to_string());
    }
    if is_qualified && !is_primary_department {
        warnings.push("Teacher is not in the primary department for this course".to_string());
    }

    AssignmentValidation {
        is_valid: errors.is_empty(),
        errors,
        warnings,
        is_qualified,
        is_primary_department,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::workload::compute_workload;

    fn qualified(id: &str, primary: bool) -> QualifiedTeacher {
        QualifiedTeacher {
            teacher_id: TeacherId::new(id),
            teacher_name: id.to_string(),
            department_name: "Science".to_string(),
            is_primary_department: primary,
        }
    }

    #[test]
    fn test_qualified_unloaded_teacher_is_valid() {
        let result = validate_teacher_assignment(
            &TeacherId::new("t-1"),
            &[qualified("t-1", true)],
            &compute_workload(4.0, 20.0, 1, 5),
            0,
        );
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_unqualified_teacher_is_error_not_panic() {
        let result = validate_teacher_assignment(
            &TeacherId::new("t-2"),
            &[qualified("t-1", true)],
            &compute_workload(0.0, 20.0, 0, 5),
            0,
        );
        assert!(!result.is_valid);
        assert!(!result.is_qualified);
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn test_overload_and_conflicts_both_reported() {
        let result = validate_teacher_assignment(
            &TeacherId::new("t-1"),
            &[qualified("t-1", true)],
            &compute_workload(20.0, 20.0, 5, 5),
            2,
        );
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors.iter().any(|e| e.contains("overloaded")));
        assert!(result.errors.iter().any(|e| e.contains("2 potential conflicts")));
    }

    #[test]
    fn test_high_workload_and_secondary_department_warn_only() {
        let result = validate_teacher_assignment(
            &TeacherId::new("t-1"),
            &[qualified("t-1", false)],
            &compute_workload(17.0, 20.0, 4, 5),
            0,
        );
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 2);
    }
}
