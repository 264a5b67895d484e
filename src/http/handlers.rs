//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{Path, Query, State},
    response::sse::{Event, Sse},
    Json,
};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;

use super::dto::{
    CancelGenerationResponse, CreateGenerationRequest, CreateGenerationResponse,
    CurriculumValidateRequest, GenerationStatusResponse, HealthResponse, SuggestionsQuery,
    ValidateAssignmentRequest,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{
    AssignmentValidation, ClassId, CourseId, CurriculumCheck, GenerationId, OfferingId, SchoolId,
    TeacherId, TermId,
};
use crate::db::services as db_services;
use crate::services::curriculum;
use crate::services::generation::GenerationRequest;
use crate::services::suggestions::DEFAULT_PARTIAL_DEPARTMENT_MATCH;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the backend
/// is accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Workload & Suggestions
// =============================================================================

/// GET /v1/schools/{school_id}/terms/{term_id}/workload-insights
///
/// Workload snapshots for every active teacher of the school in the term.
pub async fn get_workload_insights(
    State(state): State<AppState>,
    Path((school_id, term_id)): Path<(String, String)>,
) -> HandlerResult<Vec<db_services::TeacherWorkloadInsight>> {
    let insights = db_services::workload_insights_for_term(
        state.repository.as_ref(),
        &SchoolId::new(school_id),
        &TermId::new(term_id),
    )
    .await?;

    Ok(Json(insights))
}

/// GET /v1/courses/{course_id}/suggestions?term_id=...
///
/// Ranked teacher suggestions for a course within a term.
pub async fn get_teacher_suggestions(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    Query(query): Query<SuggestionsQuery>,
) -> HandlerResult<Vec<crate::api::TeacherSuggestion>> {
    if query.term_id.is_empty() {
        return Err(AppError::BadRequest("term_id is required".to_string()));
    }

    let suggestions = db_services::suggest_teachers_for_course(
        state.repository.as_ref(),
        &CourseId::new(course_id),
        &TermId::new(query.term_id),
        query.partial_match.unwrap_or(DEFAULT_PARTIAL_DEPARTMENT_MATCH),
    )
    .await?;

    Ok(Json(suggestions))
}

/// POST /v1/assignments/validate
///
/// Pre-assignment checks for a prospective (teacher, offering) pair.
pub async fn validate_assignment(
    State(state): State<AppState>,
    Json(request): Json<ValidateAssignmentRequest>,
) -> HandlerResult<AssignmentValidation> {
    let validation = db_services::validate_assignment(
        state.repository.as_ref(),
        &TeacherId::new(request.teacher_id),
        &OfferingId::new(request.offering_id),
    )
    .await?;

    Ok(Json(validation))
}

// =============================================================================
// Curriculum
// =============================================================================

/// POST /v1/curriculum/validate
///
/// Interactive curriculum-hour consistency check.
pub async fn validate_curriculum(
    Json(request): Json<CurriculumValidateRequest>,
) -> HandlerResult<CurriculumCheck> {
    Ok(Json(curriculum::validate_curriculum_hours(
        request.periods_per_week,
        request.required_hours_per_term,
        request.period_duration_minutes,
        request.weeks_per_term,
    )))
}

/// GET /v1/schools/{school_id}/curriculum-report
///
/// Consistency report across all of the school's offerings.
pub async fn get_curriculum_report(
    State(state): State<AppState>,
    Path(school_id): Path<String>,
) -> HandlerResult<Vec<crate::api::CurriculumConsistencyRow>> {
    let report = db_services::curriculum_report_for_school(
        state.repository.as_ref(),
        &SchoolId::new(school_id),
    )
    .await?;

    Ok(Json(report))
}

// =============================================================================
// Generation Jobs
// =============================================================================

/// POST /v1/generations
///
/// Start a timetable generation asynchronously. Returns 202 with the
/// generation id for tracking progress.
pub async fn create_generation(
    State(state): State<AppState>,
    Json(request): Json<CreateGenerationRequest>,
) -> Result<(axum::http::StatusCode, Json<CreateGenerationResponse>), AppError> {
    let generation_request = GenerationRequest {
        school_id: SchoolId::new(request.school_id),
        school_name: request.school_name,
        term_id: TermId::new(request.term_id),
        selected_classes: request.selected_classes.into_iter().map(ClassId::new).collect(),
        selected_teachers: request
            .selected_teachers
            .into_iter()
            .map(TeacherId::new)
            .collect(),
        constraints: request.constraints,
        optimization_level: request.optimization_level,
        time_limit: request.time_limit,
        term_start: request.term_start,
        term_end: request.term_end,
        holidays: request.holidays,
    };

    let handle = state.engine.start(generation_request).await?;
    let generation_id = handle.generation_id.to_string();

    Ok((
        axum::http::StatusCode::ACCEPTED,
        Json(CreateGenerationResponse {
            message: format!(
                "Timetable generation started. Track progress at /v1/generations/{}",
                generation_id
            ),
            generation_id,
        }),
    ))
}

/// GET /v1/generations/{generation_id}
///
/// Current status of a generation: the job record plus its event log.
/// Jobs from earlier processes are served from the repository with an
/// empty event log.
pub async fn get_generation(
    State(state): State<AppState>,
    Path(generation_id): Path<String>,
) -> HandlerResult<GenerationStatusResponse> {
    let id = GenerationId::new(generation_id);

    if let Some(job) = state.tracker().get(&id) {
        let events = state.tracker().events(&id);
        return Ok(Json(GenerationStatusResponse { job, events }));
    }

    let job = state.repository.get_generation_job(&id).await?;
    Ok(Json(GenerationStatusResponse {
        job,
        events: Vec::new(),
    }))
}

/// POST /v1/generations/{generation_id}/cancel
///
/// Request cancellation of a running generation. Lessons already
/// committed stay committed.
pub async fn cancel_generation(
    State(state): State<AppState>,
    Path(generation_id): Path<String>,
) -> HandlerResult<CancelGenerationResponse> {
    let id = GenerationId::new(generation_id);
    let cancelled = state.engine.cancel(&id);

    if !cancelled && state.tracker().get(&id).is_none() {
        // Known-but-finished jobs report cancelled=false; unknown ids 404.
        state.repository.get_generation_job(&id).await?;
    }

    Ok(Json(CancelGenerationResponse {
        generation_id: id.to_string(),
        cancelled,
    }))
}

/// GET /v1/generations/{generation_id}/events
///
/// Stream generation progress events via Server-Sent Events (SSE).
pub async fn stream_generation_events(
    State(state): State<AppState>,
    Path(generation_id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let id = GenerationId::new(generation_id);

    // Verify the generation exists before opening the stream
    if state.tracker().get(&id).is_none() {
        return Err(AppError::NotFound(format!("Generation {} not found", id)));
    }

    let tracker = state.tracker().clone();
    let stream = async_stream::stream! {
        let mut last_event_count = 0;
        loop {
            // Send new events since last check
            let events = tracker.events(&id);
            for event in events.iter().skip(last_event_count) {
                let event_data = serde_json::to_string(event).unwrap_or_default();
                yield Ok(Event::default().data(event_data));
            }
            last_event_count = events.len();

            // Check if the job reached a terminal state
            if let Some(job) = tracker.get(&id) {
                if job.status.is_terminal() {
                    let final_event = serde_json::json!({
                        "status": job.status,
                        "progress": job.progress,
                        "errors": job.errors,
                        "warnings": job.warnings,
                    });
                    yield Ok(Event::default()
                        .event("complete")
                        .data(serde_json::to_string(&final_event).unwrap_or_default()));
                    break;
                }
            } else {
                break;
            }

            // Wait before checking again
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
    };

    Ok(Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(1))
            .text("keep-alive"),
    ))
}
