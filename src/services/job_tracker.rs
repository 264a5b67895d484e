//! In-memory tracking for generation jobs.
//!
//! This module provides the live view of running generations: progress,
//! current step, and an append-only log of immutable events that the
//! progress endpoints stream to clients. It also owns the per-term
//! re-entrancy guard: one generation per term at a time.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::api::{GenerationId, TermId};
use crate::models::{GenerationJob, GenerationStatus};

/// A single progress event with timestamp and message.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GenerationEvent {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub level: GenerationEventLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationEventLevel {
    Info,
    Success,
    Warning,
    Error,
}

struct TrackedJob {
    job: GenerationJob,
    events: Vec<GenerationEvent>,
}

/// In-memory generation tracker.
#[derive(Clone)]
pub struct GenerationTracker {
    inner: Arc<RwLock<TrackerData>>,
}

#[derive(Default)]
struct TrackerData {
    jobs: HashMap<GenerationId, TrackedJob>,
    active_by_term: HashMap<TermId, GenerationId>,
}

impl GenerationTracker {
    /// Create a new empty tracker.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(TrackerData::default())),
        }
    }

    /// Register a job and claim its term.
    ///
    /// # Returns
    /// * `Ok(())` - Job registered, term claimed
    /// * `Err(existing)` - The term already has a generation in flight;
    ///   `existing` is its id. The caller must not contact the solver.
    pub fn try_begin(&self, job: GenerationJob) -> Result<(), GenerationId> {
        let mut data = self.inner.write();

        if let Some(existing) = data.active_by_term.get(&job.term_id) {
            // Stale entries cannot occur: terminal transitions release the
            // term under the same lock.
            return Err(existing.clone());
        }

        data.active_by_term
            .insert(job.term_id.clone(), job.id.clone());
        data.jobs.insert(
            job.id.clone(),
            TrackedJob {
                job,
                events: Vec::new(),
            },
        );
        Ok(())
    }

    /// Append an event to a job's log.
    pub fn event(
        &self,
        id: &GenerationId,
        level: GenerationEventLevel,
        message: impl Into<String>,
    ) {
        let mut data = self.inner.write();
        if let Some(tracked) = data.jobs.get_mut(id) {
            tracked.events.push(GenerationEvent {
                timestamp: chrono::Utc::now(),
                level,
                message: message.into(),
            });
        }
    }

    /// Update progress and the current step description.
    pub fn set_progress(&self, id: &GenerationId, progress: u8, current_step: impl Into<String>) {
        let mut data = self.inner.write();
        if let Some(tracked) = data.jobs.get_mut(id) {
            tracked.job.progress = progress.min(100);
            tracked.job.current_step = current_step.into();
        }
    }

    /// Record the solver's job id once submission succeeds.
    pub fn set_solver_job_id(&self, id: &GenerationId, solver_job_id: impl Into<String>) {
        let mut data = self.inner.write();
        if let Some(tracked) = data.jobs.get_mut(id) {
            tracked.job.solver_job_id = Some(solver_job_id.into());
        }
    }

    /// Record a per-lesson error without failing the job.
    pub fn push_error(&self, id: &GenerationId, error: impl Into<String>) {
        let mut data = self.inner.write();
        if let Some(tracked) = data.jobs.get_mut(id) {
            tracked.job.errors.push(error.into());
        }
    }

    /// Record a warning.
    pub fn push_warning(&self, id: &GenerationId, warning: impl Into<String>) {
        let mut data = self.inner.write();
        if let Some(tracked) = data.jobs.get_mut(id) {
            tracked.job.warnings.push(warning.into());
        }
    }

    /// Record lesson counters from reconciliation.
    pub fn set_lesson_counts(&self, id: &GenerationId, requested: usize, scheduled: usize) {
        let mut data = self.inner.write();
        if let Some(tracked) = data.jobs.get_mut(id) {
            tracked.job.lessons_requested = requested;
            tracked.job.lessons_scheduled = scheduled;
        }
    }

    /// Mark a job completed and release its term.
    pub fn complete(&self, id: &GenerationId) {
        let mut data = self.inner.write();
        if let Some(tracked) = data.jobs.get_mut(id) {
            tracked.job.status = GenerationStatus::Completed;
            tracked.job.progress = 100;
            tracked.job.completed_at = Some(chrono::Utc::now());
            let term = tracked.job.term_id.clone();
            data.active_by_term.remove(&term);
        }
    }

    /// Mark a job failed, record the reason, and release its term.
    pub fn fail(&self, id: &GenerationId, reason: impl Into<String>) {
        let reason = reason.into();
        let mut data = self.inner.write();
        if let Some(tracked) = data.jobs.get_mut(id) {
            tracked.job.status = GenerationStatus::Failed;
            tracked.job.completed_at = Some(chrono::Utc::now());
            tracked.job.errors.push(reason.clone());
            tracked.events.push(GenerationEvent {
                timestamp: chrono::Utc::now(),
                level: GenerationEventLevel::Error,
                message: reason,
            });
            let term = tracked.job.term_id.clone();
            data.active_by_term.remove(&term);
        }
    }

    /// Get the current state of a job.
    pub fn get(&self, id: &GenerationId) -> Option<GenerationJob> {
        self.inner.read().jobs.get(id).map(|t| t.job.clone())
    }

    /// Get all events logged for a job.
    pub fn events(&self, id: &GenerationId) -> Vec<GenerationEvent> {
        self.inner
            .read()
            .jobs
            .get(id)
            .map(|t| t.events.clone())
            .unwrap_or_default()
    }

    /// Whether a term currently has a generation in flight.
    pub fn is_generating(&self, term_id: &TermId) -> bool {
        self.inner.read().active_by_term.contains_key(term_id)
    }
}

impl Default for GenerationTracker {
    fn default() -> Self {
        Self::new()
    }
}
