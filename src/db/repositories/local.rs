//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for unit testing and local development. All data is stored in
//! memory using HashMap and Vec structures, providing fast, deterministic,
//! and isolated execution.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::api::{
    AssignmentId, CourseId, GenerationId, OfferingId, SchoolId, TeacherId, TermId, TimeSlotId,
};
use crate::db::repository::{
    AssignmentRepository, ErrorContext, GenerationRepository, LessonRepository,
    OfferingRepository, RepositoryError, RepositoryResult, TeacherRepository,
};
use crate::models::{
    ClassOffering, GenerationJob, QualifiedTeacher, ScheduledLesson, TeacherCapacity,
    TeachingAssignment, TimeSlot,
};

/// In-memory local repository.
///
/// This implementation stores all data in memory, making it ideal for unit
/// tests and local development that need isolation and speed. The
/// uniqueness constraints the hosted backend enforces on scheduled lessons
/// are enforced here too, so conflict handling is exercised identically.
///
/// Seed helpers (`store_*_impl`) populate data outside the trait surface.
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

#[derive(Default)]
struct LocalData {
    teachers: HashMap<TeacherId, TeacherCapacity>,
    qualified_by_course: HashMap<CourseId, Vec<QualifiedTeacher>>,
    offerings: HashMap<OfferingId, ClassOffering>,
    time_slots: Vec<TimeSlot>,
    assignments: HashMap<AssignmentId, TeachingAssignment>,

    // Lessons in insertion order plus the two uniqueness indexes.
    lessons: Vec<ScheduledLesson>,
    assignment_slot_keys: HashSet<(AssignmentId, NaiveDate, TimeSlotId)>,
    teacher_slot_keys: HashSet<(TeacherId, NaiveDate, TimeSlotId)>,

    generation_jobs: HashMap<GenerationId, GenerationJob>,

    is_healthy: bool,
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData {
                is_healthy: true,
                ..Default::default()
            })),
        }
    }

    /// Toggle the reported connection health. Test helper.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().unwrap().is_healthy = healthy;
    }

    /// Add a teacher capacity record.
    pub fn store_teacher_impl(&self, teacher: TeacherCapacity) {
        let mut data = self.data.write().unwrap();
        data.teachers.insert(teacher.teacher_id.clone(), teacher);
    }

    /// Register the qualified-teacher resolution for a course.
    pub fn store_qualified_teachers_impl(
        &self,
        course_id: CourseId,
        teachers: Vec<QualifiedTeacher>,
    ) {
        let mut data = self.data.write().unwrap();
        data.qualified_by_course.insert(course_id, teachers);
    }

    /// Add a class offering.
    pub fn store_offering_impl(&self, offering: ClassOffering) {
        let mut data = self.data.write().unwrap();
        data.offerings.insert(offering.id.clone(), offering);
    }

    /// Add a time slot.
    pub fn store_time_slot_impl(&self, slot: TimeSlot) {
        let mut data = self.data.write().unwrap();
        data.time_slots.push(slot);
    }

    /// Add a teaching assignment directly, bypassing conflict checks.
    pub fn store_assignment_impl(&self, assignment: TeachingAssignment) {
        let mut data = self.data.write().unwrap();
        data.assignments.insert(assignment.id.clone(), assignment);
    }

    /// Number of scheduled lessons currently stored. Test helper.
    pub fn lesson_count(&self) -> usize {
        self.data.read().unwrap().lessons.len()
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TeacherRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().unwrap().is_healthy)
    }

    async fn get_teacher_capacity(
        &self,
        teacher_id: &TeacherId,
    ) -> RepositoryResult<TeacherCapacity> {
        let data = self.data.read().unwrap();
        data.teachers.get(teacher_id).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("Teacher {} not found", teacher_id),
                ErrorContext::new("get_teacher_capacity")
                    .with_entity("teacher")
                    .with_entity_id(teacher_id),
            )
        })
    }

    async fn list_active_teachers(
        &self,
        school_id: &SchoolId,
    ) -> RepositoryResult<Vec<TeacherCapacity>> {
        let data = self.data.read().unwrap();
        let mut teachers: Vec<TeacherCapacity> = data
            .teachers
            .values()
            .filter(|t| t.is_active && &t.school_id == school_id)
            .cloned()
            .collect();
        teachers.sort_by(|a, b| a.teacher_id.cmp(&b.teacher_id));
        Ok(teachers)
    }

    async fn get_qualified_teachers(
        &self,
        course_id: &CourseId,
    ) -> RepositoryResult<Vec<QualifiedTeacher>> {
        let data = self.data.read().unwrap();
        Ok(data
            .qualified_by_course
            .get(course_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl OfferingRepository for LocalRepository {
    async fn get_offering(&self, offering_id: &OfferingId) -> RepositoryResult<ClassOffering> {
        let data = self.data.read().unwrap();
        data.offerings.get(offering_id).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("Offering {} not found", offering_id),
                ErrorContext::new("get_offering")
                    .with_entity("offering")
                    .with_entity_id(offering_id),
            )
        })
    }

    async fn list_offerings_for_school(
        &self,
        school_id: &SchoolId,
    ) -> RepositoryResult<Vec<ClassOffering>> {
        let data = self.data.read().unwrap();
        let mut offerings: Vec<ClassOffering> = data
            .offerings
            .values()
            .filter(|o| &o.school_id == school_id)
            .cloned()
            .collect();
        offerings.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(offerings)
    }

    async fn list_time_slots(&self, school_id: &SchoolId) -> RepositoryResult<Vec<TimeSlot>> {
        let data = self.data.read().unwrap();
        let mut slots: Vec<TimeSlot> = data
            .time_slots
            .iter()
            .filter(|s| &s.school_id == school_id)
            .cloned()
            .collect();
        slots.sort_by(|a, b| {
            (a.day_of_week, a.start_time.as_str()).cmp(&(b.day_of_week, b.start_time.as_str()))
        });
        Ok(slots)
    }
}

#[async_trait]
impl AssignmentRepository for LocalRepository {
    async fn assignments_for_teacher(
        &self,
        teacher_id: &TeacherId,
        term_id: &TermId,
    ) -> RepositoryResult<Vec<TeachingAssignment>> {
        let data = self.data.read().unwrap();
        let mut assignments: Vec<TeachingAssignment> = data
            .assignments
            .values()
            .filter(|a| a.is_active && &a.teacher_id == teacher_id && &a.term_id == term_id)
            .cloned()
            .collect();
        assignments.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(assignments)
    }

    async fn create_assignment(&self, assignment: &TeachingAssignment) -> RepositoryResult<()> {
        let mut data = self.data.write().unwrap();
        if data.assignments.contains_key(&assignment.id) {
            return Err(RepositoryError::conflict_with_context(
                format!("Assignment {} already exists", assignment.id),
                ErrorContext::new("create_assignment")
                    .with_entity("assignment")
                    .with_entity_id(&assignment.id),
            ));
        }
        data.assignments
            .insert(assignment.id.clone(), assignment.clone());
        Ok(())
    }

    async fn delete_assignment(&self, assignment_id: &AssignmentId) -> RepositoryResult<()> {
        let mut data = self.data.write().unwrap();
        data.assignments.remove(assignment_id).ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("Assignment {} not found", assignment_id),
                ErrorContext::new("delete_assignment")
                    .with_entity("assignment")
                    .with_entity_id(assignment_id),
            )
        })?;
        Ok(())
    }
}

#[async_trait]
impl LessonRepository for LocalRepository {
    async fn insert_scheduled_lesson(&self, lesson: &ScheduledLesson) -> RepositoryResult<()> {
        let mut data = self.data.write().unwrap();

        let teacher_id = data
            .assignments
            .get(&lesson.assignment_id)
            .map(|a| a.teacher_id.clone())
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("Assignment {} not found", lesson.assignment_id),
                    ErrorContext::new("insert_scheduled_lesson")
                        .with_entity("assignment")
                        .with_entity_id(&lesson.assignment_id),
                )
            })?;

        let assignment_key = (
            lesson.assignment_id.clone(),
            lesson.date,
            lesson.timeslot_id.clone(),
        );
        let teacher_key = (teacher_id.clone(), lesson.date, lesson.timeslot_id.clone());

        if data.assignment_slot_keys.contains(&assignment_key) {
            return Err(RepositoryError::conflict_with_context(
                format!(
                    "Lesson already scheduled for assignment {} on {} slot {}",
                    lesson.assignment_id, lesson.date, lesson.timeslot_id
                ),
                ErrorContext::new("insert_scheduled_lesson")
                    .with_entity("lesson")
                    .with_entity_id(&lesson.assignment_id),
            ));
        }
        if data.teacher_slot_keys.contains(&teacher_key) {
            return Err(RepositoryError::conflict_with_context(
                format!(
                    "Teacher {} already booked on {} slot {}",
                    teacher_id, lesson.date, lesson.timeslot_id
                ),
                ErrorContext::new("insert_scheduled_lesson")
                    .with_entity("lesson")
                    .with_entity_id(&teacher_id),
            ));
        }

        data.assignment_slot_keys.insert(assignment_key);
        data.teacher_slot_keys.insert(teacher_key);
        data.lessons.push(lesson.clone());
        Ok(())
    }

    async fn lessons_for_generation(
        &self,
        generation_id: &GenerationId,
    ) -> RepositoryResult<Vec<ScheduledLesson>> {
        let data = self.data.read().unwrap();
        Ok(data
            .lessons
            .iter()
            .filter(|l| &l.generation_id == generation_id)
            .cloned()
            .collect())
    }

    async fn lessons_for_teacher_on(
        &self,
        teacher_id: &TeacherId,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<ScheduledLesson>> {
        let data = self.data.read().unwrap();
        Ok(data
            .lessons
            .iter()
            .filter(|l| {
                l.date == date
                    && data
                        .assignments
                        .get(&l.assignment_id)
                        .map(|a| &a.teacher_id == teacher_id)
                        .unwrap_or(false)
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl GenerationRepository for LocalRepository {
    async fn create_generation_job(&self, job: &GenerationJob) -> RepositoryResult<()> {
        let mut data = self.data.write().unwrap();
        if data.generation_jobs.contains_key(&job.id) {
            return Err(RepositoryError::conflict_with_context(
                format!("Generation job {} already exists", job.id),
                ErrorContext::new("create_generation_job")
                    .with_entity("generation")
                    .with_entity_id(&job.id),
            ));
        }
        data.generation_jobs.insert(job.id.clone(), job.clone());
        Ok(())
    }

    async fn update_generation_job(&self, job: &GenerationJob) -> RepositoryResult<()> {
        let mut data = self.data.write().unwrap();
        if !data.generation_jobs.contains_key(&job.id) {
            return Err(RepositoryError::not_found_with_context(
                format!("Generation job {} not found", job.id),
                ErrorContext::new("update_generation_job")
                    .with_entity("generation")
                    .with_entity_id(&job.id),
            ));
        }
        data.generation_jobs.insert(job.id.clone(), job.clone());
        Ok(())
    }

    async fn get_generation_job(&self, id: &GenerationId) -> RepositoryResult<GenerationJob> {
        let data = self.data.read().unwrap();
        data.generation_jobs.get(id).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("Generation job {} not found", id),
                ErrorContext::new("get_generation_job")
                    .with_entity("generation")
                    .with_entity_id(id),
            )
        })
    }

    async fn list_generation_jobs_for_term(
        &self,
        term_id: &TermId,
    ) -> RepositoryResult<Vec<GenerationJob>> {
        let data = self.data.read().unwrap();
        let mut jobs: Vec<GenerationJob> = data
            .generation_jobs
            .values()
            .filter(|j| &j.term_id == term_id)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssignmentType;
    use chrono::Utc;

    fn seed_assignment(repo: &LocalRepository, id: &str, teacher: &str) -> AssignmentId {
        let assignment = TeachingAssignment {
            id: AssignmentId::new(id),
            teacher_id: TeacherId::new(teacher),
            offering_id: OfferingId::new("off-1"),
            term_id: TermId::new("term-1"),
            periods_per_week: 4,
            assignment_type: AssignmentType::Manual,
            is_active: true,
            created_at: Utc::now(),
        };
        repo.store_assignment_impl(assignment.clone());
        assignment.id
    }

    fn lesson(assignment: &AssignmentId, date: &str, slot: &str) -> ScheduledLesson {
        ScheduledLesson {
            assignment_id: assignment.clone(),
            date: date.parse().unwrap(),
            timeslot_id: TimeSlotId::new(slot),
            generation_id: GenerationId::new("gen-1"),
        }
    }

    #[tokio::test]
    async fn test_duplicate_assignment_slot_is_conflict() {
        let repo = LocalRepository::new();
        let a = seed_assignment(&repo, "a-1", "t-1");

        repo.insert_scheduled_lesson(&lesson(&a, "2026-03-02", "slot-1"))
            .await
            .unwrap();
        let err = repo
            .insert_scheduled_lesson(&lesson(&a, "2026-03-02", "slot-1"))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(repo.lesson_count(), 1);
    }

    #[tokio::test]
    async fn test_teacher_double_booking_is_conflict() {
        let repo = LocalRepository::new();
        let a1 = seed_assignment(&repo, "a-1", "t-1");
        let a2 = seed_assignment(&repo, "a-2", "t-1");

        repo.insert_scheduled_lesson(&lesson(&a1, "2026-03-02", "slot-1"))
            .await
            .unwrap();
        // Different assignment, same teacher, same slot and date.
        let err = repo
            .insert_scheduled_lesson(&lesson(&a2, "2026-03-02", "slot-1"))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_unknown_assignment_is_not_found() {
        let repo = LocalRepository::new();
        let err = repo
            .insert_scheduled_lesson(&lesson(&AssignmentId::new("ghost"), "2026-03-02", "s"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_lessons_for_teacher_on_date() {
        let repo = LocalRepository::new();
        let a1 = seed_assignment(&repo, "a-1", "t-1");
        let a2 = seed_assignment(&repo, "a-2", "t-2");

        repo.insert_scheduled_lesson(&lesson(&a1, "2026-03-02", "slot-1"))
            .await
            .unwrap();
        repo.insert_scheduled_lesson(&lesson(&a2, "2026-03-02", "slot-1"))
            .await
            .unwrap();
        repo.insert_scheduled_lesson(&lesson(&a1, "2026-03-03", "slot-1"))
            .await
            .unwrap();

        let lessons = repo
            .lessons_for_teacher_on(&TeacherId::new("t-1"), "2026-03-02".parse().unwrap())
            .await
            .unwrap();
        assert_eq!(lessons.len(), 1);
    }

    #[tokio::test]
    async fn test_health_check_reflects_toggle() {
        let repo = LocalRepository::new();
        assert!(repo.health_check().await.unwrap());
        repo.set_healthy(false);
        assert!(!repo.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_generation_job_lifecycle() {
        let repo = LocalRepository::new();
        let mut job = GenerationJob::new(GenerationId::new("gen-1"), TermId::new("term-1"));

        repo.create_generation_job(&job).await.unwrap();
        assert!(repo.create_generation_job(&job).await.unwrap_err().is_conflict());

        job.progress = 50;
        repo.update_generation_job(&job).await.unwrap();
        let stored = repo.get_generation_job(&job.id).await.unwrap();
        assert_eq!(stored.progress, 50);
    }
}
