// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Discipline listing and the period overview.

use std::collections::BTreeMap;

use aula_calc::{AverageMethod, EnrollmentStatus};
use aula_core::types::EnrollmentView;
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::catalog::ToolCatalog;
use crate::error::ToolError;

#[derive(Debug, Serialize)]
pub struct DisciplineSummary {
    pub code: String,
    pub name: String,
    pub average: f64,
    pub attendance: u8,
    pub absences: i64,
    pub status: EnrollmentStatus,
    pub method: Option<AverageMethod>,
}

impl From<&EnrollmentView> for DisciplineSummary {
    fn from(view: &EnrollmentView) -> Self {
        Self {
            code: view.course.code.clone(),
            name: view.course.name.clone(),
            average: view.enrollment.average,
            attendance: view.enrollment.attendance,
            absences: view.enrollment.absences,
            status: view.enrollment.status,
            method: view.method.as_ref().map(|m| m.kind),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DisciplinesReport {
    pub period: String,
    pub disciplines: Vec<DisciplineSummary>,
}

#[derive(Debug, Serialize)]
pub struct AtRisk {
    pub discipline: String,
    pub code: String,
    pub reasons: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct OverviewReport {
    pub period: String,
    pub total: usize,
    /// Count per status, including statuses with no enrollment.
    pub by_status: BTreeMap<String, usize>,
    pub at_risk: Vec<AtRisk>,
    pub disciplines: Vec<DisciplineSummary>,
}

/// Reasons an active or failed enrollment is below its minimums.
fn risk_reasons(view: &EnrollmentView) -> Vec<String> {
    let e = &view.enrollment;
    if !matches!(e.status, EnrollmentStatus::InProgress | EnrollmentStatus::Failed) {
        return Vec::new();
    }
    let mut reasons = Vec::new();
    if f64::from(e.attendance) < e.min_attendance {
        reasons.push(format!(
            "attendance {}% below the minimum of {}%",
            e.attendance, e.min_attendance
        ));
    }
    if e.average < e.min_average {
        reasons.push(format!(
            "average {} below the minimum of {}",
            e.average, e.min_average
        ));
    }
    reasons
}

impl ToolCatalog {
    pub(crate) async fn list_disciplines(&self) -> Result<DisciplinesReport, ToolError> {
        let views = self.enrollments().await?;
        Ok(DisciplinesReport {
            period: self.period().to_string(),
            disciplines: views.iter().map(DisciplineSummary::from).collect(),
        })
    }

    pub(crate) async fn overview(&self) -> Result<OverviewReport, ToolError> {
        let views = self.enrollments().await?;

        let mut by_status: BTreeMap<String, usize> = EnrollmentStatus::iter()
            .map(|status| (status.to_string(), 0))
            .collect();
        for view in &views {
            *by_status.entry(view.enrollment.status.to_string()).or_default() += 1;
        }

        let at_risk = views
            .iter()
            .filter_map(|view| {
                let reasons = risk_reasons(view);
                (!reasons.is_empty()).then(|| AtRisk {
                    discipline: view.course.name.clone(),
                    code: view.course.code.clone(),
                    reasons,
                })
            })
            .collect();

        Ok(OverviewReport {
            period: self.period().to_string(),
            total: views.len(),
            by_status,
            at_risk,
            disciplines: views.iter().map(DisciplineSummary::from).collect(),
        })
    }
}
