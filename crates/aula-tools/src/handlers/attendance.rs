// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Attendance queries and absence entry.

use aula_calc::{EnrollmentStatus, attendance_limit, attendance_percentage};
use aula_core::types::NewAbsence;
use chrono::NaiveDate;
use serde::Serialize;

use crate::args::AbsenceArgs;
use crate::catalog::ToolCatalog;
use crate::error::ToolError;

#[derive(Debug, Serialize)]
pub struct AbsenceEntry {
    pub date: String,
    pub justified: bool,
    pub justification: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AttendanceReport {
    pub discipline: String,
    pub code: String,
    pub total_hours: i64,
    pub absences: i64,
    pub attendance: u8,
    pub absence_limit: i64,
    pub remaining_absences: i64,
    pub min_attendance: f64,
    pub status: EnrollmentStatus,
    pub records: Vec<AbsenceEntry>,
}

#[derive(Debug, Serialize)]
pub struct AbsenceRecorded {
    pub discipline: String,
    pub date: String,
    pub justified: bool,
    pub absences: i64,
    pub attendance: u8,
    pub absence_limit: i64,
    pub remaining_absences: i64,
    pub status: EnrollmentStatus,
}

fn remaining(limit: i64, absences: i64) -> i64 {
    (limit - absences).max(0)
}

impl ToolCatalog {
    pub(crate) async fn attendance(&self, discipline: &str) -> Result<AttendanceReport, ToolError> {
        let view = self.resolve(discipline).await?;
        let records = self.store.list_absences(&view.enrollment.id).await?;
        let absences = records.len() as i64;
        let total_hours = view.course.total_hours;
        let limit = attendance_limit(total_hours);

        Ok(AttendanceReport {
            discipline: view.course.name,
            code: view.course.code,
            total_hours,
            absences,
            attendance: attendance_percentage(total_hours, absences)?,
            absence_limit: limit,
            remaining_absences: remaining(limit, absences),
            min_attendance: view.enrollment.min_attendance,
            status: view.enrollment.status,
            records: records
                .into_iter()
                .map(|r| AbsenceEntry {
                    date: r.date,
                    justified: r.justified,
                    justification: r.justification,
                })
                .collect(),
        })
    }

    pub(crate) async fn record_absence(
        &self,
        args: AbsenceArgs,
    ) -> Result<AbsenceRecorded, ToolError> {
        let date = match args.date.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| ToolError::invalid(format!("date must be YYYY-MM-DD, got '{raw}'")))?,
            _ => self.now().date(),
        };
        let justification = args.justification.filter(|j| !j.trim().is_empty());
        let justified = args.justified || justification.is_some();

        let view = self.resolve(&args.discipline).await?;
        let enrollment = self
            .store
            .record_absence(
                &view.enrollment.id,
                &NewAbsence {
                    date: date.format("%Y-%m-%d").to_string(),
                    justified,
                    justification,
                },
            )
            .await?;
        let limit = attendance_limit(view.course.total_hours);

        Ok(AbsenceRecorded {
            discipline: view.course.name,
            date: date.format("%Y-%m-%d").to_string(),
            justified,
            absences: enrollment.absences,
            attendance: enrollment.attendance,
            absence_limit: limit,
            remaining_absences: remaining(limit, enrollment.absences),
            status: enrollment.status,
        })
    }
}
