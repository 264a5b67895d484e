//! Integration tests for the generation orchestrator.
//!
//! These tests drive the full flow against the in-memory repository and a
//! scripted solver: validation, re-entrancy, submission failure, poll
//! retry and timeout, partial-failure reconciliation, and cancellation.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use classtime::api::{
    AssignmentId, ClassId, GenerationId, OfferingId, SchoolId, TeacherId, TermId, TimeSlotId,
};
use classtime::db::repo_config::SolverSettings;
use classtime::db::repositories::LocalRepository;
use classtime::db::repository::{FullRepository, GenerationRepository, LessonRepository};
use classtime::models::{AssignmentType, GenerationStatus, TeachingAssignment};
use classtime::services::generation::{GenerationEngine, GenerationError, GenerationRequest};
use classtime::services::job_tracker::GenerationTracker;
use classtime::solver::{
    LessonProposal, MockSolver, OptimizationLevel, SolverConstraints, SolverError,
    SolverStatusResponse,
};

// ==================== Helpers ====================

fn fast_settings(max_poll_attempts: u32) -> SolverSettings {
    SolverSettings {
        base_url: "http://localhost:8000".to_string(),
        poll_interval_secs: 0,
        max_poll_attempts,
    }
}

fn engine_with(
    repo: Arc<LocalRepository>,
    solver: Arc<MockSolver>,
    settings: SolverSettings,
) -> GenerationEngine {
    GenerationEngine::new(
        repo as Arc<dyn FullRepository>,
        solver,
        GenerationTracker::new(),
        settings,
    )
}

fn request(term: &str) -> GenerationRequest {
    GenerationRequest {
        school_id: SchoolId::new("s-1"),
        school_name: "Northside High".to_string(),
        term_id: TermId::new(term),
        selected_classes: vec![ClassId::new("class-1")],
        selected_teachers: vec![TeacherId::new("t-1")],
        constraints: SolverConstraints::default(),
        optimization_level: OptimizationLevel::Basic,
        time_limit: 300,
        term_start: None,
        term_end: None,
        holidays: vec![],
    }
}

fn seed_assignment(repo: &LocalRepository, id: &str, teacher: &str) {
    repo.store_assignment_impl(TeachingAssignment {
        id: AssignmentId::new(id),
        teacher_id: TeacherId::new(teacher),
        offering_id: OfferingId::new("off-1"),
        term_id: TermId::new("term-1"),
        periods_per_week: 4,
        assignment_type: AssignmentType::Manual,
        is_active: true,
        created_at: Utc::now(),
    });
}

fn proposal(assignment: &str, date: &str, slot: &str) -> LessonProposal {
    LessonProposal {
        teaching_assignment_id: AssignmentId::new(assignment),
        date: date.parse().unwrap(),
        timeslot_id: TimeSlotId::new(slot),
    }
}

// ==================== Validation ====================

#[tokio::test]
async fn test_invalid_request_is_rejected_before_any_io() {
    let repo = Arc::new(LocalRepository::new());
    let solver = Arc::new(MockSolver::new());
    let engine = engine_with(repo.clone(), solver.clone(), fast_settings(60));

    let mut bad_request = request("term-1");
    bad_request.selected_classes.clear();

    let err = engine.run(bad_request).await.unwrap_err();
    assert!(matches!(err, GenerationError::InvalidRequest(_)));

    // No network call, no job record.
    assert_eq!(solver.submit_count(), 0);
    let jobs = repo
        .list_generation_jobs_for_term(&TermId::new("term-1"))
        .await
        .unwrap();
    assert!(jobs.is_empty());
}

// ==================== Re-entrancy ====================

#[tokio::test]
async fn test_second_generation_for_generating_term_is_rejected() {
    let repo = Arc::new(LocalRepository::new());
    let solver = Arc::new(MockSolver::new());
    // Long interval keeps the first run parked in its poll loop.
    let settings = SolverSettings {
        poll_interval_secs: 30,
        ..fast_settings(60)
    };
    let engine = engine_with(repo.clone(), solver.clone(), settings);

    let handle = engine.start(request("term-1")).await.unwrap();

    // Wait for the background run to reach the solver.
    for _ in 0..100 {
        if solver.submit_count() == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(solver.submit_count(), 1);

    let err = engine.start(request("term-1")).await.unwrap_err();
    match err {
        GenerationError::AlreadyGenerating { term_id, existing } => {
            assert_eq!(term_id, TermId::new("term-1"));
            assert_eq!(existing, handle.generation_id);
        }
        other => panic!("Expected AlreadyGenerating, got {:?}", other),
    }

    // The rejected attempt never reached the solver.
    assert_eq!(solver.submit_count(), 1);

    handle.cancel();
}

#[tokio::test]
async fn test_generations_for_different_terms_are_independent() {
    let repo = Arc::new(LocalRepository::new());
    let solver = Arc::new(MockSolver::new());
    solver.queue_status(SolverStatusResponse::completed(vec![]));
    solver.queue_status(SolverStatusResponse::completed(vec![]));
    let engine = engine_with(repo.clone(), solver.clone(), fast_settings(60));

    let first = engine.run(request("term-1")).await.unwrap();
    let second = engine.run(request("term-2")).await.unwrap();

    assert_eq!(first.status, GenerationStatus::Completed);
    assert_eq!(second.status, GenerationStatus::Completed);
}

// ==================== Submission ====================

#[tokio::test]
async fn test_submission_failure_fails_job_but_record_exists() {
    let repo = Arc::new(LocalRepository::new());
    let solver = Arc::new(MockSolver::new());
    solver.fail_submission("solver unreachable");
    let engine = engine_with(repo.clone(), solver.clone(), fast_settings(60));

    let job = engine.run(request("term-1")).await.unwrap();

    assert_eq!(job.status, GenerationStatus::Failed);
    assert!(job.errors.iter().any(|e| e.contains("Failed to submit")));
    assert_eq!(solver.poll_count(), 0);

    // The job record was created before submission and updated after.
    let stored = repo.get_generation_job(&job.id).await.unwrap();
    assert_eq!(stored.status, GenerationStatus::Failed);

    // The term is free again for a fresh attempt.
    solver.queue_status(SolverStatusResponse::completed(vec![]));
    let retry = engine.run(request("term-1")).await.unwrap();
    assert_eq!(retry.status, GenerationStatus::Completed);
}

// ==================== Polling ====================

#[tokio::test]
async fn test_transport_errors_are_retried_until_success() {
    let repo = Arc::new(LocalRepository::new());
    let solver = Arc::new(MockSolver::new());
    solver.queue_error(SolverError::Transport("connection reset".to_string()));
    solver.queue_error(SolverError::Transport("connection reset".to_string()));
    solver.queue_status(SolverStatusResponse::completed(vec![]));
    let engine = engine_with(repo.clone(), solver.clone(), fast_settings(10));

    let job = engine.run(request("term-1")).await.unwrap();

    assert_eq!(job.status, GenerationStatus::Completed);
    assert_eq!(solver.poll_count(), 3);
}

#[tokio::test]
async fn test_exceeding_poll_ceiling_times_out() {
    let repo = Arc::new(LocalRepository::new());
    let solver = Arc::new(MockSolver::new());
    // Default mock response is perpetually running.
    let engine = engine_with(repo.clone(), solver.clone(), fast_settings(3));

    let job = engine.run(request("term-1")).await.unwrap();

    assert_eq!(job.status, GenerationStatus::Failed);
    assert!(job.errors.iter().any(|e| e.contains("timed out")));
    assert_eq!(solver.poll_count(), 3);
}

#[tokio::test]
async fn test_solver_reported_failure_fails_job_with_its_message() {
    let repo = Arc::new(LocalRepository::new());
    let solver = Arc::new(MockSolver::new());
    solver.queue_status(SolverStatusResponse::failed("no feasible timetable"));
    let engine = engine_with(repo.clone(), solver.clone(), fast_settings(10));

    let job = engine.run(request("term-1")).await.unwrap();

    assert_eq!(job.status, GenerationStatus::Failed);
    assert!(job.errors.iter().any(|e| e.contains("no feasible timetable")));
}

#[tokio::test]
async fn test_protocol_error_is_fatal_not_retried() {
    let repo = Arc::new(LocalRepository::new());
    let solver = Arc::new(MockSolver::new());
    solver.queue_error(SolverError::Protocol("unexpected payload".to_string()));
    solver.queue_status(SolverStatusResponse::completed(vec![]));
    let engine = engine_with(repo.clone(), solver.clone(), fast_settings(10));

    let job = engine.run(request("term-1")).await.unwrap();

    assert_eq!(job.status, GenerationStatus::Failed);
    assert_eq!(solver.poll_count(), 1);
}

// ==================== Reconciliation ====================

#[tokio::test]
async fn test_partial_conflicts_still_complete_with_errors() {
    let repo = Arc::new(LocalRepository::new());
    seed_assignment(&repo, "a-1", "t-1");
    seed_assignment(&repo, "a-2", "t-2");
    seed_assignment(&repo, "a-3", "t-3");

    // Five proposals; the last two repeat an (assignment, date, slot) key
    // already taken, so the uniqueness constraint rejects them.
    let lessons = vec![
        proposal("a-1", "2026-03-02", "slot-1"),
        proposal("a-2", "2026-03-02", "slot-1"),
        proposal("a-3", "2026-03-02", "slot-1"),
        proposal("a-1", "2026-03-02", "slot-1"),
        proposal("a-2", "2026-03-02", "slot-1"),
    ];

    let solver = Arc::new(MockSolver::new());
    solver.queue_status(SolverStatusResponse::completed(lessons));
    let engine = engine_with(repo.clone(), solver.clone(), fast_settings(10));

    let job = engine.run(request("term-1")).await.unwrap();

    // Partial success: completed, with the dropped lessons in errors.
    assert_eq!(job.status, GenerationStatus::Completed);
    assert_eq!(job.errors.len(), 2);
    assert_eq!(job.lessons_requested, 5);
    assert_eq!(job.lessons_scheduled, 3);
    assert!(job.is_partial_success());
    assert!(!job.warnings.is_empty());
    assert_eq!(repo.lesson_count(), 3);

    let stored = repo.get_generation_job(&job.id).await.unwrap();
    assert_eq!(stored.status, GenerationStatus::Completed);
    assert_eq!(stored.errors.len(), 2);
}

#[tokio::test]
async fn test_full_success_has_no_errors() {
    let repo = Arc::new(LocalRepository::new());
    seed_assignment(&repo, "a-1", "t-1");
    seed_assignment(&repo, "a-2", "t-2");

    let lessons = vec![
        proposal("a-1", "2026-03-02", "slot-1"),
        proposal("a-2", "2026-03-03", "slot-2"),
    ];

    let solver = Arc::new(MockSolver::new());
    solver.queue_status(SolverStatusResponse::completed(lessons));
    let engine = engine_with(repo.clone(), solver.clone(), fast_settings(10));

    let job = engine.run(request("term-1")).await.unwrap();

    assert_eq!(job.status, GenerationStatus::Completed);
    assert!(job.errors.is_empty());
    assert!(job.warnings.is_empty());
    assert!(!job.is_partial_success());
    assert_eq!(job.progress, 100);
    assert_eq!(repo.lesson_count(), 2);
}

#[tokio::test]
async fn test_lessons_are_scheduled_in_solver_order() {
    let repo = Arc::new(LocalRepository::new());
    seed_assignment(&repo, "a-1", "t-1");

    let lessons = vec![
        proposal("a-1", "2026-03-02", "slot-1"),
        proposal("a-1", "2026-03-02", "slot-2"),
        proposal("a-1", "2026-03-03", "slot-1"),
    ];

    let solver = Arc::new(MockSolver::new());
    solver.queue_status(SolverStatusResponse::completed(lessons.clone()));
    let engine = engine_with(repo.clone(), solver.clone(), fast_settings(10));

    let job = engine.run(request("term-1")).await.unwrap();

    let stored = repo.lessons_for_generation(&job.id).await.unwrap();
    let stored_keys: Vec<(String, String)> = stored
        .iter()
        .map(|l| (l.date.to_string(), l.timeslot_id.to_string()))
        .collect();
    assert_eq!(
        stored_keys,
        vec![
            ("2026-03-02".to_string(), "slot-1".to_string()),
            ("2026-03-02".to_string(), "slot-2".to_string()),
            ("2026-03-03".to_string(), "slot-1".to_string()),
        ]
    );
}

// ==================== Cancellation ====================

#[tokio::test]
async fn test_cancellation_stops_polling_and_fails_job() {
    let repo = Arc::new(LocalRepository::new());
    let solver = Arc::new(MockSolver::new());
    let settings = SolverSettings {
        poll_interval_secs: 1,
        ..fast_settings(600)
    };
    let engine = engine_with(repo.clone(), solver.clone(), settings);

    let handle = engine.start(request("term-1")).await.unwrap();
    let id = handle.generation_id.clone();

    // Let the run reach its poll loop, then cancel.
    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.cancel();

    let job = wait_for_terminal(&engine, &id).await;
    assert_eq!(job.status, GenerationStatus::Failed);
    assert!(job.errors.iter().any(|e| e == "cancelled"));

    // The term is released for a new attempt.
    assert!(!engine.tracker().is_generating(&TermId::new("term-1")));
}

#[tokio::test]
async fn test_cancel_by_id_through_engine() {
    let repo = Arc::new(LocalRepository::new());
    let solver = Arc::new(MockSolver::new());
    let settings = SolverSettings {
        poll_interval_secs: 1,
        ..fast_settings(600)
    };
    let engine = engine_with(repo.clone(), solver.clone(), settings);

    let handle = engine.start(request("term-1")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(engine.cancel(&handle.generation_id));
    let job = wait_for_terminal(&engine, &handle.generation_id).await;
    assert_eq!(job.status, GenerationStatus::Failed);

    // Unknown ids are reported as not cancellable.
    assert!(!engine.cancel(&GenerationId::new("ghost")));
}

async fn wait_for_terminal(
    engine: &GenerationEngine,
    id: &GenerationId,
) -> classtime::models::GenerationJob {
    for _ in 0..100 {
        if let Some(job) = engine.tracker().get(id) {
            if job.status.is_terminal() {
                return job;
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("Generation {} never reached a terminal state", id);
}
