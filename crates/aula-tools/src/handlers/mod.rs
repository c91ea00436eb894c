// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool handlers, grouped by the records they touch.

pub mod attendance;
pub mod grades;
pub mod overview;
pub mod schedule;

use aula_core::types::{Evaluation, EvaluationMethod, EnrollmentView};

use crate::catalog::ToolCatalog;
use crate::error::ToolError;

impl ToolCatalog {
    /// The method and evaluations of an enrollment; errors if it has no method.
    pub(crate) async fn method_and_evaluations(
        &self,
        view: &EnrollmentView,
    ) -> Result<(EvaluationMethod, Vec<Evaluation>), ToolError> {
        let method = match &view.method {
            Some(method) => method.clone(),
            None => self
                .store
                .get_evaluation_method(&view.enrollment.id)
                .await?
                .ok_or_else(|| {
                    ToolError::NotFound(format!(
                        "{} has no evaluation method configured",
                        view.course.name
                    ))
                })?,
        };
        let evaluations = self.store.list_evaluations(&method.id).await?;
        Ok((method, evaluations))
    }
}

/// Evaluation identified by exact id or case-insensitive name.
pub(crate) fn find_evaluation<'a>(
    evaluations: &'a [Evaluation],
    target: &str,
) -> Result<&'a Evaluation, ToolError> {
    let wanted = target.trim().to_lowercase();
    evaluations
        .iter()
        .find(|e| e.id == target || e.name.to_lowercase() == wanted)
        .ok_or_else(|| {
            let names: Vec<&str> = evaluations.iter().map(|e| e.name.as_str()).collect();
            ToolError::NotFound(format!(
                "evaluation '{target}' not found; available: {}",
                names.join(", ")
            ))
        })
}

/// Rejects scores outside `0..=max`.
pub(crate) fn check_score(score: f64, max: f64) -> Result<(), ToolError> {
    if score.is_finite() && (0.0..=max).contains(&score) {
        Ok(())
    } else {
        Err(ToolError::invalid(format!("score must be between 0 and {max}, got {score}")))
    }
}
