// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Attendance limit and attendance percentage.

use tracing::warn;

use crate::error::CalcError;

/// Share of the total course hours a student may miss.
const ABSENCE_ALLOWANCE: f64 = 0.25;

/// Maximum number of absences tolerated for a course of `total_hours`.
///
/// Returns 0 for non-positive totals.
pub fn attendance_limit(total_hours: i64) -> i64 {
    if total_hours <= 0 {
        return 0;
    }
    (total_hours as f64 * ABSENCE_ALLOWANCE).floor() as i64
}

/// Attendance percentage (0..=100) given total course hours and absences.
///
/// A non-positive `total_hours` yields 100: the course has no workload
/// configured, so nothing can be missed. This is logged at warn level because
/// it usually means the course record is incomplete.
pub fn attendance_percentage(total_hours: i64, absences: i64) -> Result<u8, CalcError> {
    if absences < 0 {
        return Err(CalcError::NegativeAbsences(absences));
    }
    if total_hours <= 0 {
        warn!(total_hours, absences, "course has no workload, reporting full attendance");
        return Ok(100);
    }
    if absences >= total_hours {
        return Ok(0);
    }

    let present = (total_hours - absences) as f64;
    let pct = (present / total_hours as f64 * 100.0).round();
    Ok(pct.clamp(0.0, 100.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tracing_test::traced_test;

    #[test]
    fn limit_is_a_quarter_rounded_down() {
        assert_eq!(attendance_limit(60), 15);
        assert_eq!(attendance_limit(45), 11);
        assert_eq!(attendance_limit(3), 0);
    }

    #[test]
    fn limit_is_zero_without_workload() {
        assert_eq!(attendance_limit(0), 0);
        assert_eq!(attendance_limit(-30), 0);
    }

    #[test]
    fn percentage_rounds_to_nearest() {
        assert_eq!(attendance_percentage(60, 0).unwrap(), 100);
        assert_eq!(attendance_percentage(60, 15).unwrap(), 75);
        // 58/60 = 96.67
        assert_eq!(attendance_percentage(60, 2).unwrap(), 97);
        // 44/45 = 97.78
        assert_eq!(attendance_percentage(45, 1).unwrap(), 98);
    }

    #[test]
    fn percentage_is_zero_when_every_hour_was_missed() {
        assert_eq!(attendance_percentage(60, 60).unwrap(), 0);
        assert_eq!(attendance_percentage(60, 75).unwrap(), 0);
    }

    #[test]
    fn negative_absences_are_rejected() {
        assert_eq!(
            attendance_percentage(60, -1),
            Err(CalcError::NegativeAbsences(-1))
        );
    }

    #[test]
    #[traced_test]
    fn missing_workload_reports_full_attendance() {
        assert_eq!(attendance_percentage(0, 4).unwrap(), 100);
        assert!(logs_contain("course has no workload"));
    }

    proptest! {
        #[test]
        fn percentage_matches_formula(total in 1i64..2000, frac in 0.0f64..=1.0) {
            let absences = ((total as f64) * frac).floor() as i64;
            let absences = absences.min(total);
            let expected = if absences >= total {
                0
            } else {
                (((total - absences) as f64 / total as f64) * 100.0).round() as u8
            };
            prop_assert_eq!(attendance_percentage(total, absences).unwrap(), expected);
        }

        #[test]
        fn percentage_never_exceeds_bounds(total in -100i64..2000, absences in 0i64..3000) {
            let pct = attendance_percentage(total, absences).unwrap();
            prop_assert!(pct <= 100);
        }

        #[test]
        fn negative_absences_always_fail(total in -100i64..2000, absences in i64::MIN..0) {
            prop_assert!(attendance_percentage(total, absences).is_err());
        }
    }
}
