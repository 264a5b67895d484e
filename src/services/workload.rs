//! Teacher workload computation.
//!
//! Derives a workload snapshot for a (teacher, term) pair from the
//! teacher's committed weekly hours and capacity limits. The snapshot is
//! never stored; it is recomputed from assignments on demand.

use serde::{Deserialize, Serialize};

/// Utilization below this is `Available`.
pub const AVAILABLE_BELOW: f64 = 60.0;
/// Utilization below this is `Moderate`; it is also the recommendation cutoff.
pub const MODERATE_BELOW: f64 = 80.0;
/// Utilization below this is `High`; at or above, `Overloaded`.
pub const HIGH_BELOW: f64 = 100.0;

/// Workload band for a teacher within a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadStatus {
    Available,
    Moderate,
    High,
    Overloaded,
}

impl WorkloadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkloadStatus::Available => "available",
            WorkloadStatus::Moderate => "moderate",
            WorkloadStatus::High => "high",
            WorkloadStatus::Overloaded => "overloaded",
        }
    }

    /// Band for a utilization percentage. First match wins:
    /// `<60` available, `<80` moderate, `<100` high, otherwise overloaded.
    pub fn from_utilization(utilization: f64) -> Self {
        if utilization < AVAILABLE_BELOW {
            WorkloadStatus::Available
        } else if utilization < MODERATE_BELOW {
            WorkloadStatus::Moderate
        } else if utilization < HIGH_BELOW {
            WorkloadStatus::High
        } else {
            WorkloadStatus::Overloaded
        }
    }
}

/// Derived workload figures for a (teacher, term) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadSnapshot {
    pub current_hours_per_week: f64,
    pub max_hours_per_week: f64,
    pub current_courses_count: u32,
    pub max_courses_count: u32,
    pub utilization_percentage: f64,
    pub workload_status: WorkloadStatus,
    pub available_hours: f64,
    pub recommended_for_new_assignments: bool,
}

/// Compute a workload snapshot.
///
/// Inputs are expected to be non-negative; callers clamp before calling.
/// A zero hour ceiling yields zero utilization rather than a division by
/// zero.
pub fn compute_workload(
    current_hours_per_week: f64,
    max_hours_per_week: f64,
    current_courses_count: u32,
    max_courses_count: u32,
) -> WorkloadSnapshot {
    let utilization = if max_hours_per_week > 0.0 {
        (current_hours_per_week / max_hours_per_week) * 100.0
    } else {
        0.0
    };

    let workload_status = WorkloadStatus::from_utilization(utilization);
    let available_hours = (max_hours_per_week - current_hours_per_week).max(0.0);
    let recommended_for_new_assignments =
        utilization < MODERATE_BELOW && current_courses_count < max_courses_count;

    WorkloadSnapshot {
        current_hours_per_week,
        max_hours_per_week,
        current_courses_count,
        max_courses_count,
        utilization_percentage: utilization,
        workload_status,
        available_hours,
        recommended_for_new_assignments,
    }
}

impl WorkloadSnapshot {
    /// Snapshot for a teacher with no committed hours against the given
    /// limits. Used when a qualified teacher has no assignments yet.
    pub fn empty(max_hours_per_week: f64, max_courses_count: u32) -> Self {
        compute_workload(0.0, max_hours_per_week, 0, max_courses_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_max_hours_yields_zero_utilization() {
        let snapshot = compute_workload(10.0, 0.0, 1, 5);
        assert_eq!(snapshot.utilization_percentage, 0.0);
        assert_eq!(snapshot.workload_status, WorkloadStatus::Available);
    }

    #[test]
    fn test_band_boundaries_are_exact() {
        assert_eq!(
            WorkloadStatus::from_utilization(59.999),
            WorkloadStatus::Available
        );
        assert_eq!(WorkloadStatus::from_utilization(60.0), WorkloadStatus::Moderate);
        assert_eq!(WorkloadStatus::from_utilization(79.999), WorkloadStatus::Moderate);
        assert_eq!(WorkloadStatus::from_utilization(80.0), WorkloadStatus::High);
        assert_eq!(WorkloadStatus::from_utilization(99.999), WorkloadStatus::High);
        assert_eq!(
            WorkloadStatus::from_utilization(100.0),
            WorkloadStatus::Overloaded
        );
        assert_eq!(
            WorkloadStatus::from_utilization(140.0),
            WorkloadStatus::Overloaded
        );
    }

    #[test]
    fn test_sixteen_of_twenty_hours() {
        // 16/20 hours: 80% utilization sits in the high band, and 80 is
        // not < 80, so the teacher is not recommended for new work.
        let snapshot = compute_workload(16.0, 20.0, 3, 5);
        assert_eq!(snapshot.utilization_percentage, 80.0);
        assert_eq!(snapshot.workload_status, WorkloadStatus::High);
        assert_eq!(snapshot.available_hours, 4.0);
        assert!(!snapshot.recommended_for_new_assignments);
    }

    #[test]
    fn test_available_hours_never_negative() {
        let snapshot = compute_workload(25.0, 20.0, 5, 5);
        assert_eq!(snapshot.available_hours, 0.0);
        assert_eq!(snapshot.workload_status, WorkloadStatus::Overloaded);
    }

    #[test]
    fn test_recommendation_requires_course_headroom() {
        let snapshot = compute_workload(5.0, 20.0, 5, 5);
        assert_eq!(snapshot.workload_status, WorkloadStatus::Available);
        assert!(!snapshot.recommended_for_new_assignments);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = WorkloadSnapshot::empty(20.0, 5);
        assert_eq!(snapshot.current_hours_per_week, 0.0);
        assert_eq!(snapshot.utilization_percentage, 0.0);
        assert!(snapshot.recommended_for_new_assignments);
    }
}
