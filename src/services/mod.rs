//! Service layer for business logic and orchestration.
//!
//! This module contains the service layer that sits between the repository
//! port and the HTTP surface. The workload, suggestion, curriculum, and
//! assignment services are pure computation; the generation service
//! orchestrates the external solver and the repository.

pub mod assignment;
pub mod curriculum;
pub mod generation;
pub mod job_tracker;
pub mod suggestions;
pub mod workload;

pub use assignment::validate_teacher_assignment;
pub use curriculum::{curriculum_consistency_report, validate_curriculum_hours};
pub use generation::{GenerationEngine, GenerationError, GenerationHandle, GenerationRequest};
pub use job_tracker::GenerationTracker;
pub use suggestions::suggest_teachers;
pub use workload::compute_workload;
