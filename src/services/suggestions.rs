//! Teacher suggestion ranking for a course.
//!
//! Scores qualified teachers by department alignment and current workload
//! and produces a deterministic, human-readable ranking. The reasoning
//! strings are assembled from fixed templates so identical inputs always
//! yield identical output.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::api::TeacherId;
use crate::models::school::{DEFAULT_MAX_COURSES_COUNT, DEFAULT_MAX_HOURS_PER_WEEK};
use crate::models::QualifiedTeacher;
use crate::services::workload::{WorkloadSnapshot, WorkloadStatus};

/// Department-match weight in the combined score.
pub const DEPARTMENT_WEIGHT: f64 = 0.6;
/// Workload weight in the combined score.
pub const WORKLOAD_WEIGHT: f64 = 0.4;
/// Score a teacher must exceed to be recommended.
pub const RECOMMEND_ABOVE: f64 = 70.0;
/// Default department match for qualified teachers outside the course's
/// primary department. Call sites may pass anything in the 0.5-0.8 range.
pub const DEFAULT_PARTIAL_DEPARTMENT_MATCH: f64 = 0.8;

/// A ranked teacher suggestion for a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherSuggestion {
    pub teacher_id: TeacherId,
    pub teacher_name: String,
    pub department_name: String,
    pub current_hours_per_week: f64,
    pub max_hours_per_week: f64,
    pub current_courses_count: u32,
    pub max_courses_count: u32,
    pub workload_status: WorkloadStatus,
    /// 0-100 combined department/workload score.
    pub match_score: f64,
    pub reasoning: String,
    pub recommended: bool,
}

/// Rank qualified teachers for a course.
///
/// `workloads` maps teacher ids to their current term snapshot; a
/// qualified teacher without an entry is treated as having no committed
/// hours against the default capacity limits.
///
/// The output is sorted with recommended teachers first, then by
/// descending match score. The sort is stable, so ties keep their input
/// order and the ranking is reproducible.
pub fn suggest_teachers(
    qualified: &[QualifiedTeacher],
    workloads: &HashMap<TeacherId, WorkloadSnapshot>,
    partial_match: f64,
) -> Vec<TeacherSuggestion> {
    let mut suggestions: Vec<TeacherSuggestion> = qualified
        .iter()
        .map(|teacher| {
            let fallback =
                WorkloadSnapshot::empty(DEFAULT_MAX_HOURS_PER_WEEK, DEFAULT_MAX_COURSES_COUNT);
            let workload = workloads.get(&teacher.teacher_id).unwrap_or(&fallback);

            let department_match = if teacher.is_primary_department {
                1.0
            } else {
                partial_match
            };
            let workload_score = (1.0 - workload.utilization_percentage / 100.0).max(0.0);
            let match_score =
                (department_match * DEPARTMENT_WEIGHT + workload_score * WORKLOAD_WEIGHT) * 100.0;

            let recommended = match_score > RECOMMEND_ABOVE
                && workload.workload_status != WorkloadStatus::Overloaded;

            TeacherSuggestion {
                teacher_id: teacher.teacher_id.clone(),
                teacher_name: teacher.teacher_name.clone(),
                department_name: teacher.department_name.clone(),
                current_hours_per_week: workload.current_hours_per_week,
                max_hours_per_week: workload.max_hours_per_week,
                current_courses_count: workload.current_courses_count,
                max_courses_count: workload.max_courses_count,
                workload_status: workload.workload_status,
                match_score,
                reasoning: build_reasoning(teacher.is_primary_department, workload),
                recommended,
            }
        })
        .collect();

    // Stable: equal keys keep input order.
    suggestions.sort_by(|a, b| {
        b.recommended
            .cmp(&a.recommended)
            .then_with(|| b.match_score.total_cmp(&a.match_score))
    });

    suggestions
}

/// Assemble the reasoning string from the fixed phrase templates.
fn build_reasoning(is_primary_department: bool, workload: &WorkloadSnapshot) -> String {
    let mut reasons = Vec::new();

    if is_primary_department {
        reasons.push("Perfect department alignment");
    } else {
        reasons.push("Partial department alignment");
    }

    if workload.utilization_percentage < 60.0 {
        reasons.push("Low workload - highly available");
    } else if workload.utilization_percentage < 80.0 {
        reasons.push("Moderate workload - good availability");
    } else {
        reasons.push("High workload - limited availability");
    }

    if workload.current_courses_count < workload.max_courses_count {
        reasons.push("Has capacity for additional courses");
    }

    reasons.join(". ")
}
