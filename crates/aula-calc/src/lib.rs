// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Calculation engine for the Aula academic assistant.
//!
//! Pure, deterministic functions that turn raw grade and attendance records
//! into attendance percentages, averages, projections, simulations and an
//! enrollment status. Nothing in this crate performs I/O.
//!
//! Every average-like computation shares the [`is_graded`] predicate, so an
//! evaluation without an obtained score is excluded from both the numerator
//! and the denominator everywhere.

pub mod attendance;
pub mod error;
pub mod grades;
pub mod projection;
pub mod schedule;
pub mod status;

pub use attendance::{attendance_limit, attendance_percentage};
pub use error::CalcError;
pub use grades::{
    AverageMethod, GradeItem, all_graded, apply_substitution, average_for, is_graded, round2,
    simple_average, substitution_average, weighted_average,
};
pub use projection::{Projection, projection, simulate};
pub use schedule::{Scheduled, next_class, parse_start_time, weekday_from_name, weekday_name};
pub use status::{EnrollmentStatus, determine_status};

/// Default minimum passing average when an enrollment does not declare one.
pub const DEFAULT_MIN_AVERAGE: f64 = 5.0;

/// Default minimum attendance percentage when an enrollment does not declare one.
pub const DEFAULT_MIN_ATTENDANCE: f64 = 75.0;

/// Highest score an evaluation can be graded with on the default scale.
pub const MAX_SCORE: f64 = 10.0;
