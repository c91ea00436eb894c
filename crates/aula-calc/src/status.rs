// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Enrollment status derivation.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Lifecycle status of an enrollment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EnrollmentStatus {
    InProgress,
    Approved,
    Failed,
    /// Set administratively; never produced by [`determine_status`].
    Withdrawn,
}

/// Status implied by the current numbers.
///
/// While any required evaluation is ungraded the status is always
/// [`EnrollmentStatus::InProgress`]. Once everything is graded the student is
/// approved iff both the average and the attendance reach their minimums
/// (equality passes).
pub fn determine_status(
    average: f64,
    attendance: f64,
    min_average: f64,
    min_attendance: f64,
    all_graded: bool,
) -> EnrollmentStatus {
    if !all_graded {
        return EnrollmentStatus::InProgress;
    }
    if average >= min_average && attendance >= min_attendance {
        EnrollmentStatus::Approved
    } else {
        EnrollmentStatus::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn boundary_values_pass() {
        assert_eq!(
            determine_status(5.0, 75.0, 5.0, 75.0, true),
            EnrollmentStatus::Approved
        );
    }

    #[test]
    fn low_average_fails() {
        assert_eq!(
            determine_status(4.99, 100.0, 5.0, 75.0, true),
            EnrollmentStatus::Failed
        );
    }

    #[test]
    fn low_attendance_fails() {
        assert_eq!(
            determine_status(10.0, 74.0, 5.0, 75.0, true),
            EnrollmentStatus::Failed
        );
    }

    #[test]
    fn status_strings() {
        assert_eq!(EnrollmentStatus::InProgress.to_string(), "in_progress");
        assert_eq!(
            "withdrawn".parse::<EnrollmentStatus>().unwrap(),
            EnrollmentStatus::Withdrawn
        );
    }

    proptest! {
        #[test]
        fn ungraded_is_always_in_progress(
            average in 0.0f64..=10.0,
            attendance in 0.0f64..=100.0,
            min_average in 0.0f64..=10.0,
            min_attendance in 0.0f64..=100.0,
        ) {
            prop_assert_eq!(
                determine_status(average, attendance, min_average, min_attendance, false),
                EnrollmentStatus::InProgress
            );
        }
    }
}
