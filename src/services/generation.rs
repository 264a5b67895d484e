//! Timetable generation orchestration.
//!
//! Drives one generation run end to end: validate the request, persist the
//! job record, submit to the external solver, poll until the solver
//! finishes, then reconcile the proposed lessons into the repository with
//! per-lesson conflict accounting. The orchestrator never runs the
//! combinatorial search itself; every step is asynchronous I/O against the
//! solver port or the repository port.
//!
//! One generation per term runs at a time; generations for different terms
//! share no mutable state and may run in parallel.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::warn;
use parking_lot::Mutex;

use crate::api::{ClassId, GenerationId, SchoolId, TeacherId, TermId};
use crate::db::repo_config::SolverSettings;
use crate::db::repository::{FullRepository, RepositoryError};
use crate::models::{GenerationJob, ScheduledLesson};
use crate::services::job_tracker::{GenerationEventLevel, GenerationTracker};
use crate::solver::{
    OptimizationLevel, SchoolConfig, SolverClient, SolverConstraints, SolverJobStatus,
    SolverRequest, SolverStatusResponse,
};

/// Solver time budget bounds, in seconds.
const MIN_TIME_LIMIT_SECS: u64 = 60;
const MAX_TIME_LIMIT_SECS: u64 = 3600;

/// A request to generate a timetable for a term.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub school_id: SchoolId,
    pub school_name: String,
    pub term_id: TermId,
    pub selected_classes: Vec<ClassId>,
    pub selected_teachers: Vec<TeacherId>,
    pub constraints: SolverConstraints,
    pub optimization_level: OptimizationLevel,
    /// Solver time budget in seconds.
    pub time_limit: u64,
    pub term_start: Option<chrono::NaiveDate>,
    pub term_end: Option<chrono::NaiveDate>,
    pub holidays: Vec<chrono::NaiveDate>,
}

/// Errors surfaced to the caller before a job starts running.
///
/// Once a job record exists, failures are recorded on the job itself
/// (status `Failed`) rather than returned as errors.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The request failed synchronous validation; nothing was persisted
    /// and the solver was not contacted.
    #[error("Invalid generation request: {0}")]
    InvalidRequest(String),

    /// The term already has a generation in flight.
    #[error("A generation is already running for term {term_id} (job {existing})")]
    AlreadyGenerating {
        term_id: TermId,
        existing: GenerationId,
    },

    /// The job record could not be created.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Cooperative cancellation flag checked at every suspension point.
#[derive(Clone, Default, Debug)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. The in-flight run stops at its next
    /// suspension point; lessons already committed stay committed.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Handle to a generation started in the background.
#[derive(Debug)]
pub struct GenerationHandle {
    pub generation_id: GenerationId,
    token: CancellationToken,
}

impl GenerationHandle {
    /// Request cancellation of the running generation.
    pub fn cancel(&self) {
        self.token.cancel();
    }
}

/// Orchestrates generation runs against a repository and a solver client.
#[derive(Clone)]
pub struct GenerationEngine {
    repository: Arc<dyn FullRepository>,
    solver: Arc<dyn SolverClient>,
    tracker: GenerationTracker,
    settings: SolverSettings,
    tokens: Arc<Mutex<HashMap<GenerationId, CancellationToken>>>,
}

impl GenerationEngine {
    pub fn new(
        repository: Arc<dyn FullRepository>,
        solver: Arc<dyn SolverClient>,
        tracker: GenerationTracker,
        settings: SolverSettings,
    ) -> Self {
        Self {
            repository,
            solver,
            tracker,
            settings,
            tokens: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// The tracker observed by progress endpoints.
    pub fn tracker(&self) -> &GenerationTracker {
        &self.tracker
    }

    /// Request cancellation of a running generation by id.
    ///
    /// # Returns
    /// `true` if the job was running and has been signalled.
    pub fn cancel(&self, id: &GenerationId) -> bool {
        match self.tokens.lock().get(id) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Run a generation to completion and return the final job state.
    ///
    /// Returns `Err` only for failures that happen before the job record
    /// exists (validation, re-entrancy, record creation). After that the
    /// outcome lives on the returned job: `Failed` for submission errors,
    /// solver failure, timeout, or cancellation; `Completed` otherwise,
    /// with per-lesson conflicts accumulated in `errors`.
    pub async fn run(&self, request: GenerationRequest) -> Result<GenerationJob, GenerationError> {
        let (id, token) = self.begin(&request).await?;
        self.execute(id.clone(), request, token).await;
        self.tracker.get(&id).ok_or_else(|| {
            GenerationError::Repository(RepositoryError::internal("generation job state lost"))
        })
    }

    /// Start a generation in the background and return a handle
    /// immediately. Progress is observable through the tracker.
    pub async fn start(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationHandle, GenerationError> {
        let (id, token) = self.begin(&request).await?;
        let engine = self.clone();
        let run_id = id.clone();
        let run_token = token.clone();
        tokio::spawn(async move {
            engine.execute(run_id, request, run_token).await;
        });
        Ok(GenerationHandle {
            generation_id: id,
            token,
        })
    }

    /// Steps 1-2: synchronous validation, term claim, and job record
    /// creation. No solver contact happens here.
    async fn begin(
        &self,
        request: &GenerationRequest,
    ) -> Result<(GenerationId, CancellationToken), GenerationError> {
        validate_request(request)?;

        let job = GenerationJob::new(GenerationId::random(), request.term_id.clone());
        let id = job.id.clone();

        if let Err(existing) = self.tracker.try_begin(job.clone()) {
            return Err(GenerationError::AlreadyGenerating {
                term_id: request.term_id.clone(),
                existing,
            });
        }

        // The record must exist before the solver is contacted so that
        // submission failures stay auditable.
        if let Err(e) = self.repository.create_generation_job(&job).await {
            self.tracker.fail(&id, format!("Failed to create job record: {}", e));
            return Err(GenerationError::Repository(e));
        }

        self.tracker.event(
            &id,
            GenerationEventLevel::Info,
            "Starting timetable generation...",
        );

        let token = CancellationToken::new();
        self.tokens.lock().insert(id.clone(), token.clone());
        Ok((id, token))
    }

    /// Steps 3-6: submit, poll, reconcile. All failures end up on the job.
    async fn execute(
        &self,
        id: GenerationId,
        request: GenerationRequest,
        token: CancellationToken,
    ) {
        self.drive(&id, request, &token).await;
        // Whatever path ended the run, sync the job row and release the
        // cancellation token.
        self.persist(&id).await;
        self.tokens.lock().remove(&id);
    }

    async fn drive(&self, id: &GenerationId, request: GenerationRequest, token: &CancellationToken) {
        self.tracker
            .set_progress(id, 5, "Preparing timetable request...");

        let solver_request = build_solver_request(id, &request);

        if token.is_cancelled() {
            self.finish_cancelled(id, None).await;
            return;
        }

        let solver_job = match self.solver.submit(&solver_request).await {
            Ok(job) => job,
            Err(e) => {
                self.tracker
                    .fail(id, format!("Failed to submit timetable request: {}", e));
                return;
            }
        };

        self.tracker.set_solver_job_id(id, &solver_job.job_id);
        self.tracker
            .set_progress(id, 10, "Processing timetable request...");
        self.tracker.event(
            id,
            GenerationEventLevel::Info,
            format!("Submitted to solver as job {}", solver_job.job_id),
        );

        self.poll_until_done(id, &solver_job.job_id, token).await;
    }

    /// Step 4: fixed-interval poll loop with a bounded attempt count.
    /// Transport errors are retried up to the ceiling; exceeding the
    /// ceiling is fatal.
    async fn poll_until_done(&self, id: &GenerationId, solver_job_id: &str, token: &CancellationToken) {
        let mut attempts = 0u32;

        while attempts < self.settings.max_poll_attempts {
            if token.is_cancelled() {
                self.finish_cancelled(id, Some(solver_job_id)).await;
                return;
            }

            match self.solver.poll_status(solver_job_id).await {
                Ok(status) => match status.status {
                    SolverJobStatus::Completed => {
                        self.reconcile(id, status, token).await;
                        return;
                    }
                    SolverJobStatus::Failed => {
                        let reason = status
                            .error
                            .unwrap_or_else(|| "Generation failed".to_string());
                        self.tracker.fail(id, reason);
                        return;
                    }
                    SolverJobStatus::Queued | SolverJobStatus::Running => {
                        self.report_partial_progress(id, &status);
                    }
                },
                Err(e) if e.is_retryable() => {
                    self.tracker.event(
                        id,
                        GenerationEventLevel::Warning,
                        format!("Status poll failed, retrying: {}", e),
                    );
                }
                Err(e) => {
                    self.tracker.fail(id, format!("Solver poll failed: {}", e));
                    return;
                }
            }

            tokio::time::sleep(self.settings.poll_interval()).await;
            attempts += 1;
        }

        self.tracker.fail(id, "Timetable generation timed out");
    }

    /// Map solver progress into the 10-90 band while the job runs; 100 is
    /// reserved for completion.
    fn report_partial_progress(&self, id: &GenerationId, status: &SolverStatusResponse) {
        let solver_progress = status.progress.unwrap_or(0.0).clamp(0.0, 100.0);
        let progress = (10.0 + solver_progress * 0.8).min(90.0) as u8;
        let step = status
            .message
            .clone()
            .unwrap_or_else(|| "Processing...".to_string());
        self.tracker.set_progress(id, progress, step);
    }

    /// Step 5: persist each proposed lesson in solver order. Conflicts are
    /// recorded and skipped; one bad lesson never aborts the rest.
    async fn reconcile(&self, id: &GenerationId, status: SolverStatusResponse, token: &CancellationToken) {
        let lessons = status
            .result
            .map(|r| r.lessons)
            .unwrap_or_default();

        self.tracker
            .set_progress(id, 90, "Scheduling generated lessons...");

        let requested = lessons.len();
        let mut scheduled = 0usize;

        for proposal in lessons {
            if token.is_cancelled() {
                self.tracker.set_lesson_counts(id, requested, scheduled);
                self.finish_cancelled(id, None).await;
                return;
            }

            let lesson = ScheduledLesson {
                assignment_id: proposal.teaching_assignment_id.clone(),
                date: proposal.date,
                timeslot_id: proposal.timeslot_id.clone(),
                generation_id: id.clone(),
            };

            match self.repository.insert_scheduled_lesson(&lesson).await {
                Ok(()) => scheduled += 1,
                Err(e) => {
                    // Conflicts and other per-lesson failures alike: record
                    // and move on to the remaining lessons.
                    self.tracker.push_error(id, e.to_string());
                }
            }
        }

        self.tracker.set_lesson_counts(id, requested, scheduled);

        let dropped = requested - scheduled;
        if dropped > 0 {
            self.tracker.push_warning(
                id,
                "Some lessons could not be scheduled due to conflicts".to_string(),
            );
            self.tracker.event(
                id,
                GenerationEventLevel::Warning,
                format!("{} of {} lessons dropped", dropped, requested),
            );
        }

        self.tracker.event(
            id,
            GenerationEventLevel::Success,
            format!("Timetable generation completed, {} lessons scheduled", scheduled),
        );
        self.tracker
            .set_progress(id, 100, "Timetable generation completed");
        self.tracker.complete(id);
    }

    /// Cancellation path: stop polling, best-effort cancel on the solver,
    /// mark the job failed. Committed lessons stay committed.
    async fn finish_cancelled(&self, id: &GenerationId, solver_job_id: Option<&str>) {
        if let Some(job_id) = solver_job_id {
            if let Err(e) = self.solver.cancel(job_id).await {
                warn!("Solver cancel for job {} failed: {}", job_id, e);
            }
        }
        self.tracker.fail(id, "cancelled");
    }

    /// Sync the tracker's job state into the repository. Best-effort: a
    /// stale row must not fail the run that produced it.
    async fn persist(&self, id: &GenerationId) {
        if let Some(job) = self.tracker.get(id) {
            if let Err(e) = self.repository.update_generation_job(&job).await {
                warn!("Failed to persist generation job {}: {}", id, e);
            }
        }
    }
}

/// Step 1: synchronous request validation, no I/O.
fn validate_request(request: &GenerationRequest) -> Result<(), GenerationError> {
    let mut errors = Vec::new();

    if request.school_id.as_str().is_empty() {
        errors.push("School configuration is required");
    }
    if request.term_id.as_str().is_empty() {
        errors.push("Term is required");
    }
    if request.selected_classes.is_empty() {
        errors.push("At least one class must be selected");
    }
    if request.selected_teachers.is_empty() {
        errors.push("At least one teacher must be selected");
    }
    if request.time_limit < MIN_TIME_LIMIT_SECS || request.time_limit > MAX_TIME_LIMIT_SECS {
        errors.push("Time limit must be between 1 and 60 minutes");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(GenerationError::InvalidRequest(errors.join(", ")))
    }
}

fn build_solver_request(id: &GenerationId, request: &GenerationRequest) -> SolverRequest {
    SolverRequest {
        school_config: SchoolConfig {
            id: request.school_id.clone(),
            name: request.school_name.clone(),
            constraints: request.constraints.clone(),
        },
        term_id: request.term_id.clone(),
        generation_id: id.clone(),
        selected_classes: request.selected_classes.clone(),
        selected_teachers: request.selected_teachers.clone(),
        optimization_level: request.optimization_level,
        time_limit: request.time_limit,
        holidays: request.holidays.clone(),
        term_start: request.term_start,
        term_end: request.term_end,
    }
}
