//! Domain models for school timetabling.
//!
//! These are the records the repository port reads and writes: teacher
//! capacity configuration, class offerings, teaching assignments, scheduled
//! lessons, and generation job lifecycle records.

pub mod assignment;
pub mod generation;
pub mod school;

pub use assignment::{AssignmentType, ClassOffering, TeachingAssignment};
pub use generation::{GenerationJob, GenerationStatus, ScheduledLesson};
pub use school::{QualifiedTeacher, TeacherCapacity, TimeSlot};
