//! HTTP client for the timetable solver service.
//!
//! Talks to the deployed AI service over its job API:
//! `POST /generate`, `GET /job-status/{job_id}`, `POST /cancel/{job_id}`.

use async_trait::async_trait;
use reqwest::StatusCode;

use super::{SolverClient, SolverError, SolverJob, SolverRequest, SolverStatusResponse};

/// Solver client backed by reqwest.
pub struct HttpSolver {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSolver {
    /// Create a client for the service at `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl SolverClient for HttpSolver {
    async fn submit(&self, request: &SolverRequest) -> Result<SolverJob, SolverError> {
        let response = self
            .client
            .post(self.url("generate"))
            .json(request)
            .send()
            .await
            .map_err(|e| SolverError::Transport(e.to_string()))?;

        match response.status() {
            status if status.is_success() => response
                .json::<SolverJob>()
                .await
                .map_err(|e| SolverError::Protocol(format!("Invalid submit response: {}", e))),
            StatusCode::UNPROCESSABLE_ENTITY | StatusCode::BAD_REQUEST => {
                let body = response.text().await.unwrap_or_default();
                Err(SolverError::Rejected(body))
            }
            status => Err(SolverError::Rejected(format!(
                "Solver returned HTTP {}",
                status
            ))),
        }
    }

    async fn poll_status(&self, job_id: &str) -> Result<SolverStatusResponse, SolverError> {
        let response = self
            .client
            .get(self.url(&format!("job-status/{}", job_id)))
            .send()
            .await
            .map_err(|e| SolverError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SolverError::Transport(format!(
                "Status poll returned HTTP {}",
                response.status()
            )));
        }

        response
            .json::<SolverStatusResponse>()
            .await
            .map_err(|e| SolverError::Protocol(format!("Invalid status response: {}", e)))
    }

    async fn cancel(&self, job_id: &str) -> Result<(), SolverError> {
        let response = self
            .client
            .post(self.url(&format!("cancel/{}", job_id)))
            .send()
            .await
            .map_err(|e| SolverError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SolverError::Rejected(format!(
                "Cancel returned HTTP {}",
                response.status()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building_tolerates_trailing_slash() {
        let solver = HttpSolver::new("http://localhost:8000/");
        assert_eq!(
            solver.url("job-status/j-1"),
            "http://localhost:8000/job-status/j-1"
        );
    }
}
