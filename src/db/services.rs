//! High-level database service layer.
//!
//! This module provides repository-agnostic operations that combine
//! repository reads with the pure services: workload snapshots from
//! assignment rows, suggestion inputs, the curriculum report, and
//! pre-assignment validation. These functions contain the business logic
//! that should be consistent regardless of the storage backend.

use chrono::{NaiveDate, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::repository::{FullRepository, RepositoryError, RepositoryResult};
use crate::api::{AssignmentId, CourseId, OfferingId, SchoolId, TeacherId, TermId, TimeSlotId};
use crate::models::school::{DEFAULT_MAX_COURSES_COUNT, DEFAULT_MAX_HOURS_PER_WEEK};
use crate::models::{AssignmentType, TeachingAssignment};
use crate::services::assignment::{validate_teacher_assignment, AssignmentValidation};
use crate::services::curriculum::{
    curriculum_consistency_report, CurriculumConsistencyRow, DEFAULT_PERIOD_DURATION_MINUTES,
    DEFAULT_WEEKS_PER_TERM,
};
use crate::services::suggestions::{suggest_teachers, TeacherSuggestion};
use crate::services::workload::{compute_workload, WorkloadSnapshot};

// ==================== Health & Connection ====================

/// Check if the backend connection is healthy.
///
/// This is a simple pass-through to the repository's health check.
pub async fn health_check(repo: &dyn FullRepository) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Workload ====================

/// Workload snapshot plus teacher identity, for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherWorkloadInsight {
    pub teacher_id: TeacherId,
    pub teacher_name: String,
    pub workload: WorkloadSnapshot,
}

/// Compute the workload snapshot for a (teacher, term) pair.
///
/// Sums `periods_per_week` over the teacher's active assignments in the
/// term and applies the teacher's capacity limits. One period counts as
/// one weekly hour, matching how capacity limits are declared.
///
/// # Returns
/// * `Ok(WorkloadSnapshot)` - Derived figures, never stored
/// * `Err(RepositoryError::NotFound)` - If the teacher doesn't exist
pub async fn teacher_workload(
    repo: &dyn FullRepository,
    teacher_id: &TeacherId,
    term_id: &TermId,
) -> RepositoryResult<WorkloadSnapshot> {
    let capacity = repo.get_teacher_capacity(teacher_id).await?;
    let assignments = repo.assignments_for_teacher(teacher_id, term_id).await?;

    let current_hours: f64 = assignments.iter().map(|a| a.periods_per_week as f64).sum();
    let current_courses = assignments.len() as u32;

    Ok(compute_workload(
        current_hours,
        capacity.effective_max_hours(),
        current_courses,
        capacity.effective_max_courses(),
    ))
}

/// Like [`teacher_workload`], but a missing capacity record falls back to
/// the default limits instead of failing. Suggestion ranking uses this so
/// one unconfigured teacher does not sink the whole ranking.
async fn teacher_workload_or_default(
    repo: &dyn FullRepository,
    teacher_id: &TeacherId,
    term_id: &TermId,
) -> RepositoryResult<WorkloadSnapshot> {
    let (max_hours, max_courses) = match repo.get_teacher_capacity(teacher_id).await {
        Ok(capacity) => (capacity.effective_max_hours(), capacity.effective_max_courses()),
        Err(RepositoryError::NotFound { .. }) => {
            (DEFAULT_MAX_HOURS_PER_WEEK, DEFAULT_MAX_COURSES_COUNT)
        }
        Err(e) => return Err(e),
    };

    let assignments = repo.assignments_for_teacher(teacher_id, term_id).await?;
    let current_hours: f64 = assignments.iter().map(|a| a.periods_per_week as f64).sum();

    Ok(compute_workload(
        current_hours,
        max_hours,
        assignments.len() as u32,
        max_courses,
    ))
}

/// Workload snapshots for every active teacher of a school within a term.
pub async fn workload_insights_for_term(
    repo: &dyn FullRepository,
    school_id: &SchoolId,
    term_id: &TermId,
) -> RepositoryResult<Vec<TeacherWorkloadInsight>> {
    let teachers = repo.list_active_teachers(school_id).await?;
    let mut insights = Vec::with_capacity(teachers.len());

    for teacher in teachers {
        let workload = teacher_workload(repo, &teacher.teacher_id, term_id).await?;
        insights.push(TeacherWorkloadInsight {
            teacher_id: teacher.teacher_id,
            teacher_name: teacher.display_name,
            workload,
        });
    }

    Ok(insights)
}

// ==================== Suggestions ====================

/// Rank the teachers qualified for a course by department alignment and
/// current workload within a term.
///
/// An empty qualified list yields an empty ranking, not an error.
pub async fn suggest_teachers_for_course(
    repo: &dyn FullRepository,
    course_id: &CourseId,
    term_id: &TermId,
    partial_match: f64,
) -> RepositoryResult<Vec<TeacherSuggestion>> {
    let qualified = repo.get_qualified_teachers(course_id).await?;
    if qualified.is_empty() {
        return Ok(Vec::new());
    }

    let mut workloads = HashMap::with_capacity(qualified.len());
    for teacher in &qualified {
        let snapshot = teacher_workload_or_default(repo, &teacher.teacher_id, term_id).await?;
        workloads.insert(teacher.teacher_id.clone(), snapshot);
    }

    Ok(suggest_teachers(&qualified, &workloads, partial_match))
}

// ==================== Curriculum ====================

/// Consistency report across all offerings of a school.
pub async fn curriculum_report_for_school(
    repo: &dyn FullRepository,
    school_id: &SchoolId,
) -> RepositoryResult<Vec<CurriculumConsistencyRow>> {
    let offerings = repo.list_offerings_for_school(school_id).await?;
    info!(
        "Building curriculum consistency report for {} offerings",
        offerings.len()
    );
    Ok(curriculum_consistency_report(
        &offerings,
        DEFAULT_PERIOD_DURATION_MINUTES,
        DEFAULT_WEEKS_PER_TERM,
    ))
}

// ==================== Pre-assignment Validation ====================

/// Validate a prospective (teacher, offering) assignment: qualification,
/// workload headroom, and duplicate-booking conflicts.
///
/// Business-rule violations come back inside the result, never as `Err`.
pub async fn validate_assignment(
    repo: &dyn FullRepository,
    teacher_id: &TeacherId,
    offering_id: &OfferingId,
) -> RepositoryResult<AssignmentValidation> {
    let offering = repo.get_offering(offering_id).await?;
    let qualified = repo.get_qualified_teachers(&offering.course_id).await?;
    let workload = teacher_workload_or_default(repo, teacher_id, &offering.term_id).await?;

    let conflict_count = repo
        .assignments_for_teacher(teacher_id, &offering.term_id)
        .await?
        .iter()
        .filter(|a| a.offering_id == offering.id)
        .count();

    Ok(validate_teacher_assignment(
        teacher_id,
        &qualified,
        &workload,
        conflict_count,
    ))
}

// ==================== Assignment Commits ====================

/// Commit a teacher to a class offering.
///
/// Used both when an administrator confirms a suggestion (`Manual` /
/// `AiSuggested`) and when the orchestrator applies one (`Ai`). The
/// assignment inherits the offering's weekly cadence.
pub async fn apply_teacher_assignment(
    repo: &dyn FullRepository,
    offering_id: &OfferingId,
    teacher_id: &TeacherId,
    assignment_type: AssignmentType,
) -> RepositoryResult<TeachingAssignment> {
    let offering = repo.get_offering(offering_id).await?;

    let assignment = TeachingAssignment {
        id: AssignmentId::new(uuid::Uuid::new_v4().to_string()),
        teacher_id: teacher_id.clone(),
        offering_id: offering.id.clone(),
        term_id: offering.term_id.clone(),
        periods_per_week: offering.periods_per_week,
        assignment_type,
        is_active: true,
        created_at: Utc::now(),
    };

    repo.create_assignment(&assignment).await?;
    info!(
        "Assigned teacher {} to offering {} ({})",
        teacher_id,
        offering.id,
        assignment_type.as_str()
    );
    Ok(assignment)
}

/// Remove a teaching assignment (administrative removal or generation
/// rollback).
pub async fn remove_teacher_assignment(
    repo: &dyn FullRepository,
    assignment_id: &AssignmentId,
) -> RepositoryResult<()> {
    repo.delete_assignment(assignment_id).await
}

// ==================== Timetable View ====================

/// One scheduled lesson joined with its time slot, for timetable display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableLessonView {
    pub assignment_id: AssignmentId,
    pub date: NaiveDate,
    pub timeslot_id: TimeSlotId,
    pub day_of_week: Option<u8>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub period_number: Option<u32>,
}

/// A teacher's lessons on a date, joined with the school's time slots and
/// ordered by slot start time. Lessons whose slot is unknown sort last.
pub async fn teacher_timetable_for_date(
    repo: &dyn FullRepository,
    school_id: &SchoolId,
    teacher_id: &TeacherId,
    date: NaiveDate,
) -> RepositoryResult<Vec<TimetableLessonView>> {
    let slots = repo.list_time_slots(school_id).await?;
    let slots_by_id: HashMap<&TimeSlotId, &crate::models::TimeSlot> =
        slots.iter().map(|s| (&s.id, s)).collect();

    let mut views: Vec<TimetableLessonView> = repo
        .lessons_for_teacher_on(teacher_id, date)
        .await?
        .into_iter()
        .map(|lesson| {
            let slot = slots_by_id.get(&lesson.timeslot_id);
            TimetableLessonView {
                assignment_id: lesson.assignment_id,
                date: lesson.date,
                timeslot_id: lesson.timeslot_id,
                day_of_week: slot.map(|s| s.day_of_week),
                start_time: slot.map(|s| s.start_time.clone()),
                end_time: slot.map(|s| s.end_time.clone()),
                period_number: slot.and_then(|s| s.period_number),
            }
        })
        .collect();

    views.sort_by(|a, b| match (&a.start_time, &b.start_time) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    Ok(views)
}
