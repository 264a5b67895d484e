//! Database module for school timetabling data.
//!
//! This module provides abstractions over the hosted relational backend
//! via the Repository pattern, allowing storage backends to be swapped.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (REST API, library callers)          │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs) - Business Logic           │
//! │  - Workload snapshots from assignment rows               │
//! │  - Suggestion input assembly                             │
//! │  - Curriculum consistency report                         │
//! └───────────────────┬─────────────────────────────────────┘
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface   │
//! └───────────────────┬─────────────────────────────────────┘
//!     ┌───────────────▼──────────────────────────────┐
//!     │             Local Repository                  │
//!     │               (in-memory)                     │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! # Recommended Usage
//!
//! **For new code, use the service layer:**
//! ```ignore
//! use classtime::db::{services, factory::RepositoryFactory};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = RepositoryFactory::from_env()?;
//!     let insights =
//!         services::workload_insights_for_term(repo.as_ref(), &school, &term).await?;
//!     Ok(())
//! }
//! ```

#[cfg(not(feature = "local-repo"))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;

// ==================== Service Layer (Recommended for new code) ====================
// Use these high-level functions that work with any repository implementation

pub use services::{
    apply_teacher_assignment, curriculum_report_for_school, health_check,
    remove_teacher_assignment, suggest_teachers_for_course, teacher_timetable_for_date,
    teacher_workload, validate_assignment, workload_insights_for_term, TeacherWorkloadInsight,
    TimetableLessonView,
};

// ==================== Repository Pattern Exports ====================

pub use factory::{RepositoryFactory, RepositoryType};
pub use repo_config::BackendConfig;
#[cfg(feature = "local-repo")]
pub use repositories::LocalRepository;
pub use repository::{
    AssignmentRepository, ErrorContext, FullRepository, GenerationRepository, LessonRepository,
    OfferingRepository, RepositoryError, RepositoryResult, TeacherRepository,
};

use std::sync::{Arc, OnceLock};

/// Global repository instance initialized once per process.
static REPOSITORY: OnceLock<Arc<dyn FullRepository>> = OnceLock::new();

/// Initialize the global repository from configuration.
///
/// Tries `classtime.toml` first, then falls back to environment-based
/// configuration. Safe to call more than once; only the first call wins.
pub fn init_repository() -> Result<(), String> {
    if REPOSITORY.get().is_some() {
        return Ok(());
    }

    let repo = BackendConfig::from_default_location()
        .map_err(|e| e.to_string())
        .and_then(|config| {
            let repo_type = config.repository_type()?;
            RepositoryFactory::create(repo_type).map_err(|e| e.to_string())
        })
        .or_else(|_| RepositoryFactory::from_env().map_err(|e| e.to_string()))?;

    // A racing initializer may have won; that instance is equivalent.
    let _ = REPOSITORY.set(repo);
    Ok(())
}

/// Get the global repository instance.
///
/// # Returns
/// * `Ok(&Arc<dyn FullRepository>)` - If initialized
/// * `Err(String)` - If `init_repository` has not run
pub fn get_repository() -> Result<&'static Arc<dyn FullRepository>, String> {
    REPOSITORY
        .get()
        .ok_or_else(|| "Repository not initialized; call init_repository() first".to_string())
}
