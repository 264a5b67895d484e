//! # Classtime Backend
//!
//! School timetable orchestration backend.
//!
//! This crate provides the scheduling core of a school administration
//! system: teacher workload analysis, teacher-to-course suggestion
//! ranking, curriculum-hour consistency checks, and the asynchronous
//! timetable generation flow around an external solver service. The
//! backend exposes a REST API via Axum for the administration frontend.
//!
//! ## Features
//!
//! - **Workload**: Utilization and status bands per (teacher, term)
//! - **Suggestions**: Deterministic teacher ranking per course
//! - **Curriculum**: Periods-vs-hours consistency validation and reports
//! - **Generation**: Submit, poll, and reconcile timetable generation
//!   jobs with per-lesson conflict accounting
//! - **HTTP API**: RESTful endpoints with SSE progress streaming
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Identifier newtypes and DTO re-exports
//! - [`models`]: Domain records (capacity, offerings, assignments, jobs)
//! - [`db`]: Repository pattern over the hosted backend, service layer
//! - [`services`]: Business logic and the generation orchestrator
//! - [`solver`]: Typed port for the external timetable solver
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod api;

pub mod db;
pub mod models;

pub mod services;

pub mod solver;

#[cfg(feature = "http-server")]
pub mod http;
