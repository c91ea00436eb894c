// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Academic record persistence.

use async_trait::async_trait;

use crate::error::AulaError;
use crate::traits::storage::StorageAdapter;
use crate::types::{
    AbsenceRecord, ClassSlot, Enrollment, EnrollmentView, Evaluation, EvaluationMethod, NewAbsence,
};

/// Read and mutate a student's academic records.
///
/// Every mutation recomputes the owning enrollment's average, attendance and
/// status in the same transaction as the write, and returns the recomputed
/// enrollment.
#[async_trait]
pub trait AcademicStore: StorageAdapter {
    /// Enrollments of a student joined with course and method, optionally
    /// restricted to one academic period.
    async fn enrollments_for_student(
        &self,
        student_id: &str,
        period: Option<&str>,
    ) -> Result<Vec<EnrollmentView>, AulaError>;

    async fn get_evaluation_method(
        &self,
        enrollment_id: &str,
    ) -> Result<Option<EvaluationMethod>, AulaError>;

    async fn list_evaluations(&self, method_id: &str) -> Result<Vec<Evaluation>, AulaError>;

    /// Sets (or clears, with `None`) an evaluation's obtained score.
    async fn set_evaluation_score(
        &self,
        evaluation_id: &str,
        score: Option<f64>,
    ) -> Result<Enrollment, AulaError>;

    async fn record_absence(
        &self,
        enrollment_id: &str,
        absence: &NewAbsence,
    ) -> Result<Enrollment, AulaError>;

    /// Absences of an enrollment, most recent first.
    async fn list_absences(&self, enrollment_id: &str) -> Result<Vec<AbsenceRecord>, AulaError>;

    /// Recomputes average, attendance and status from the current records.
    async fn recompute_enrollment(&self, enrollment_id: &str) -> Result<Enrollment, AulaError>;

    /// Weekly class slots of the courses the student takes in `period`.
    async fn class_schedule(
        &self,
        student_id: &str,
        period: &str,
    ) -> Result<Vec<ClassSlot>, AulaError>;
}
