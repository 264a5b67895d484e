//! Curriculum-hour consistency validation.
//!
//! Checks that an offering's declared `periods_per_week` and
//! `required_hours_per_term` agree: the hours implied by the weekly cadence
//! over the term should land near the declared requirement. Large variance
//! is a data-quality finding, not an error, so the validator always returns
//! a result.

use serde::{Deserialize, Serialize};

use crate::models::ClassOffering;

/// Default teaching period length in minutes.
pub const DEFAULT_PERIOD_DURATION_MINUTES: f64 = 50.0;
/// Default term length in weeks.
pub const DEFAULT_WEEKS_PER_TERM: f64 = 16.0;
/// Absolute variance band, in hours, inside which the declaration counts
/// as consistent. One rule everywhere: |expected - required| <= 5.0.
pub const VARIANCE_TOLERANCE_HOURS: f64 = 5.0;

/// Outcome of a curriculum-hour check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurriculumStatus {
    /// Declared hours sit within the tolerance band.
    Valid,
    /// Cadence implies more hours than required.
    Over,
    /// Cadence implies fewer hours than required.
    Under,
    /// No hour requirement declared; only periods matter.
    NotApplicable,
}

impl CurriculumStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CurriculumStatus::Valid => "valid",
            CurriculumStatus::Over => "over",
            CurriculumStatus::Under => "under",
            CurriculumStatus::NotApplicable => "not_applicable",
        }
    }

    pub fn is_consistent(&self) -> bool {
        matches!(self, CurriculumStatus::Valid | CurriculumStatus::NotApplicable)
    }
}

/// Result of validating one offering's declared hours.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurriculumCheck {
    pub expected_hours: f64,
    /// `expected - required`; absent when no requirement is declared.
    pub variance_hours: Option<f64>,
    pub status: CurriculumStatus,
    pub message: String,
    pub recommendation: Option<String>,
}

/// Row of the school-wide consistency report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurriculumConsistencyRow {
    pub class_name: String,
    pub course_name: String,
    pub periods_per_week: u32,
    pub required_hours_per_term: Option<f64>,
    pub expected_hours: f64,
    pub variance_hours: Option<f64>,
    pub status: CurriculumStatus,
    pub recommendation: Option<String>,
}

/// Hours implied by a weekly cadence over a term.
pub fn expected_hours(
    periods_per_week: u32,
    period_duration_minutes: f64,
    weeks_per_term: f64,
) -> f64 {
    periods_per_week as f64 * (period_duration_minutes / 60.0) * weeks_per_term
}

/// Periods per week that would best satisfy an hour requirement.
pub fn recommended_periods_per_week(
    required_hours_per_term: f64,
    period_duration_minutes: f64,
    weeks_per_term: f64,
) -> u32 {
    let per_period_hours = weeks_per_term * period_duration_minutes;
    if per_period_hours <= 0.0 {
        return 0;
    }
    ((required_hours_per_term * 60.0) / per_period_hours).round() as u32
}

/// Validate that declared periods and required hours are mutually
/// consistent.
///
/// `required_hours_per_term = None` means no explicit requirement; the
/// check returns [`CurriculumStatus::NotApplicable`] and skips the
/// variance computation.
pub fn validate_curriculum_hours(
    periods_per_week: u32,
    required_hours_per_term: Option<f64>,
    period_duration_minutes: f64,
    weeks_per_term: f64,
) -> CurriculumCheck {
    let expected = expected_hours(periods_per_week, period_duration_minutes, weeks_per_term);

    let required = match required_hours_per_term {
        Some(required) => required,
        None => {
            return CurriculumCheck {
                expected_hours: expected,
                variance_hours: None,
                status: CurriculumStatus::NotApplicable,
                message: "No hour requirement declared; periods stand alone".to_string(),
                recommendation: None,
            };
        }
    };

    let variance = expected - required;

    if variance.abs() <= VARIANCE_TOLERANCE_HOURS {
        return CurriculumCheck {
            expected_hours: expected,
            variance_hours: Some(variance),
            status: CurriculumStatus::Valid,
            message: "Hours and periods are consistent".to_string(),
            recommendation: None,
        };
    }

    let message = format!(
        "Expected {:.1} hours but required {:.1} hours (variance: {:.1})",
        expected, required, variance
    );

    if variance > 0.0 {
        CurriculumCheck {
            expected_hours: expected,
            variance_hours: Some(variance),
            status: CurriculumStatus::Over,
            message,
            recommendation: Some(format!(
                "Consider increasing required_hours_per_term to {:.1}",
                expected
            )),
        }
    } else {
        let periods = recommended_periods_per_week(
            required,
            period_duration_minutes,
            weeks_per_term,
        );
        CurriculumCheck {
            expected_hours: expected,
            variance_hours: Some(variance),
            status: CurriculumStatus::Under,
            message,
            recommendation: Some(format!(
                "Consider increasing periods_per_week to {}",
                periods
            )),
        }
    }
}

/// Validate with the default period duration and term length.
pub fn validate_curriculum_hours_default(
    periods_per_week: u32,
    required_hours_per_term: Option<f64>,
) -> CurriculumCheck {
    validate_curriculum_hours(
        periods_per_week,
        required_hours_per_term,
        DEFAULT_PERIOD_DURATION_MINUTES,
        DEFAULT_WEEKS_PER_TERM,
    )
}

/// Consistency report across a set of offerings.
pub fn curriculum_consistency_report(
    offerings: &[ClassOffering],
    period_duration_minutes: f64,
    weeks_per_term: f64,
) -> Vec<CurriculumConsistencyRow> {
    offerings
        .iter()
        .map(|offering| {
            let check = validate_curriculum_hours(
                offering.periods_per_week,
                offering.required_hours_per_term,
                period_duration_minutes,
                weeks_per_term,
            );
            CurriculumConsistencyRow {
                class_name: offering.class_name.clone(),
                course_name: offering.course_name.clone(),
                periods_per_week: offering.periods_per_week,
                required_hours_per_term: offering.required_hours_per_term,
                expected_hours: check.expected_hours,
                variance_hours: check.variance_hours,
                status: check.status,
                recommendation: check.recommendation,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_requirement_is_not_applicable() {
        let check = validate_curriculum_hours(5, None, 50.0, 16.0);
        assert_eq!(check.status, CurriculumStatus::NotApplicable);
        assert!(check.variance_hours.is_none());
        assert!(check.recommendation.is_none());
        // 5 periods * 50/60 h * 16 weeks
        assert!((check.expected_hours - 66.666_666).abs() < 1e-3);
    }

    #[test]
    fn test_exact_match_is_valid_with_zero_variance() {
        // 3 periods * 50/60 * 16 = 40.0 exactly.
        let check = validate_curriculum_hours(3, Some(40.0), 50.0, 16.0);
        assert_eq!(check.status, CurriculumStatus::Valid);
        assert_eq!(check.variance_hours, Some(0.0));
    }

    #[test]
    fn test_variance_inside_band_is_valid() {
        let check = validate_curriculum_hours(3, Some(36.0), 50.0, 16.0);
        assert_eq!(check.variance_hours, Some(4.0));
        assert_eq!(check.status, CurriculumStatus::Valid);
    }

    #[test]
    fn test_over_suggests_raising_required_hours() {
        // Expected 66.7, required 40: over by 26.7 hours.
        let check = validate_curriculum_hours(5, Some(40.0), 50.0, 16.0);
        assert_eq!(check.status, CurriculumStatus::Over);
        let rec = check.recommendation.unwrap();
        assert!(rec.contains("required_hours_per_term"));
        assert!(rec.contains("66.7"));
    }

    #[test]
    fn test_under_suggests_more_periods() {
        // Expected 26.7, required 60: under by 33.3 hours.
        let check = validate_curriculum_hours(2, Some(60.0), 50.0, 16.0);
        assert_eq!(check.status, CurriculumStatus::Under);
        let rec = check.recommendation.unwrap();
        // 60 h * 60 min / (16 weeks * 50 min) = 4.5 -> rounds away from zero
        assert!(rec.contains("periods_per_week"));
        assert!(rec.ends_with("5"));
    }

    #[test]
    fn test_default_wrapper_matches_explicit_defaults() {
        let a = validate_curriculum_hours_default(4, Some(53.0));
        let b = validate_curriculum_hours(4, Some(53.0), 50.0, 16.0);
        assert_eq!(a.status, b.status);
        assert_eq!(a.variance_hours, b.variance_hours);
    }

    #[test]
    fn test_report_covers_every_offering() {
        use crate::api::{ClassId, CourseId, OfferingId, SchoolId, TermId};
        let offerings: Vec<ClassOffering> = [(5u32, Some(40.0)), (3, Some(40.0)), (2, None)]
            .iter()
            .enumerate()
            .map(|(i, (periods, required))| ClassOffering {
                id: OfferingId::new(format!("off-{}", i)),
                school_id: SchoolId::new("s-1"),
                course_id: CourseId::new("c-1"),
                class_id: ClassId::new("cl-1"),
                term_id: TermId::new("term-1"),
                course_name: "Algebra".to_string(),
                class_name: format!("Grade {}", i),
                department_id: None,
                periods_per_week: *periods,
                required_hours_per_term: *required,
            })
            .collect();

        let report = curriculum_consistency_report(&offerings, 50.0, 16.0);
        assert_eq!(report.len(), 3);
        assert_eq!(report[0].status, CurriculumStatus::Over);
        assert_eq!(report[1].status, CurriculumStatus::Valid);
        assert_eq!(report[2].status, CurriculumStatus::NotApplicable);
    }
}
