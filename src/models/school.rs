//! Teacher and school configuration records.

use serde::{Deserialize, Serialize};

use crate::api::{DepartmentId, SchoolId, TeacherId, TimeSlotId};

/// Default weekly hour ceiling applied when a teacher record carries none.
pub const DEFAULT_MAX_HOURS_PER_WEEK: f64 = 20.0;

/// Default concurrent course ceiling applied when a teacher record carries none.
pub const DEFAULT_MAX_COURSES_COUNT: u32 = 5;

/// Teacher capacity configuration.
///
/// Immutable from the scheduling core's point of view: capacity limits are
/// edited only through administrative updates in the surrounding product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherCapacity {
    pub teacher_id: TeacherId,
    pub school_id: SchoolId,
    pub display_name: String,
    /// Primary department, used for suggestion department matching.
    pub primary_department: Option<DepartmentId>,
    pub max_hours_per_week: f64,
    pub max_courses_count: u32,
    pub is_active: bool,
}

impl TeacherCapacity {
    /// Weekly hour ceiling, falling back to the default when unset or zero.
    pub fn effective_max_hours(&self) -> f64 {
        if self.max_hours_per_week > 0.0 {
            self.max_hours_per_week
        } else {
            DEFAULT_MAX_HOURS_PER_WEEK
        }
    }

    /// Concurrent course ceiling, falling back to the default when zero.
    pub fn effective_max_courses(&self) -> u32 {
        if self.max_courses_count > 0 {
            self.max_courses_count
        } else {
            DEFAULT_MAX_COURSES_COUNT
        }
    }
}

/// A teacher qualified to teach a course, as resolved by the
/// department-membership lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualifiedTeacher {
    pub teacher_id: TeacherId,
    pub teacher_name: String,
    pub department_name: String,
    /// Whether the qualifying department is the teacher's primary one.
    pub is_primary_department: bool,
}

/// One fixed-duration teaching slot within a school day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: TimeSlotId,
    pub school_id: SchoolId,
    /// ISO weekday, 1 = Monday.
    pub day_of_week: u8,
    /// Wall-clock start, "HH:MM".
    pub start_time: String,
    /// Wall-clock end, "HH:MM".
    pub end_time: String,
    pub period_number: Option<u32>,
    pub is_teaching_period: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capacity(max_hours: f64, max_courses: u32) -> TeacherCapacity {
        TeacherCapacity {
            teacher_id: TeacherId::new("t-1"),
            school_id: SchoolId::new("s-1"),
            display_name: "Ada Lovelace".to_string(),
            primary_department: Some(DepartmentId::new("dept-math")),
            max_hours_per_week: max_hours,
            max_courses_count: max_courses,
            is_active: true,
        }
    }

    #[test]
    fn test_effective_limits_fall_back_to_defaults() {
        let c = capacity(0.0, 0);
        assert_eq!(c.effective_max_hours(), DEFAULT_MAX_HOURS_PER_WEEK);
        assert_eq!(c.effective_max_courses(), DEFAULT_MAX_COURSES_COUNT);
    }

    #[test]
    fn test_effective_limits_respect_configured_values() {
        let c = capacity(18.0, 4);
        assert_eq!(c.effective_max_hours(), 18.0);
        assert_eq!(c.effective_max_courses(), 4);
    }
}
