//! Scripted in-process solver for tests and local development.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{SolverClient, SolverError, SolverJob, SolverRequest, SolverStatusResponse};

/// A solver client that replays scripted responses.
///
/// Poll responses queued with [`MockSolver::queue_status`] are consumed in
/// order; once the queue is empty, every further poll returns the default
/// response (running at 50%), which keeps a poll loop spinning for timeout
/// tests. Submission succeeds unless a failure is scripted.
pub struct MockSolver {
    submit_error: Mutex<Option<String>>,
    statuses: Mutex<VecDeque<Result<SolverStatusResponse, SolverError>>>,
    submit_count: AtomicUsize,
    poll_count: AtomicUsize,
    cancel_count: AtomicUsize,
    last_request: Mutex<Option<SolverRequest>>,
}

impl MockSolver {
    pub fn new() -> Self {
        Self {
            submit_error: Mutex::new(None),
            statuses: Mutex::new(VecDeque::new()),
            submit_count: AtomicUsize::new(0),
            poll_count: AtomicUsize::new(0),
            cancel_count: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Script the next submission to fail with a rejection.
    pub fn fail_submission(&self, message: impl Into<String>) {
        *self.submit_error.lock() = Some(message.into());
    }

    /// Queue a poll response.
    pub fn queue_status(&self, response: SolverStatusResponse) {
        self.statuses.lock().push_back(Ok(response));
    }

    /// Queue a poll-level error.
    pub fn queue_error(&self, error: SolverError) {
        self.statuses.lock().push_back(Err(error));
    }

    pub fn submit_count(&self) -> usize {
        self.submit_count.load(Ordering::SeqCst)
    }

    pub fn poll_count(&self) -> usize {
        self.poll_count.load(Ordering::SeqCst)
    }

    pub fn cancel_count(&self) -> usize {
        self.cancel_count.load(Ordering::SeqCst)
    }

    /// The most recently submitted request, if any.
    pub fn last_request(&self) -> Option<SolverRequest> {
        self.last_request.lock().clone()
    }
}

impl Default for MockSolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SolverClient for MockSolver {
    async fn submit(&self, request: &SolverRequest) -> Result<SolverJob, SolverError> {
        self.submit_count.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock() = Some(request.clone());

        if let Some(message) = self.submit_error.lock().take() {
            return Err(SolverError::Rejected(message));
        }

        Ok(SolverJob {
            job_id: format!("mock-job-{}", request.generation_id),
        })
    }

    async fn poll_status(&self, _job_id: &str) -> Result<SolverStatusResponse, SolverError> {
        self.poll_count.fetch_add(1, Ordering::SeqCst);

        match self.statuses.lock().pop_front() {
            Some(scripted) => scripted,
            None => Ok(SolverStatusResponse::running(50.0, "Solving...")),
        }
    }

    async fn cancel(&self, _job_id: &str) -> Result<(), SolverError> {
        self.cancel_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
