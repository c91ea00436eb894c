// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Averages, score entry, projections and simulations.

use aula_calc::{
    AverageMethod, EnrollmentStatus, GradeItem, MAX_SCORE, Projection, average_for, is_graded,
    projection, simulate,
};
use aula_core::types::Evaluation;
use serde::Serialize;

use crate::args::{ProjectionArgs, ScoreArgs};
use crate::catalog::ToolCatalog;
use crate::error::ToolError;
use crate::handlers::{check_score, find_evaluation};

#[derive(Debug, Serialize)]
pub struct EvaluationSummary {
    pub id: String,
    pub name: String,
    pub weight: f64,
    pub max_score: f64,
    pub score: Option<f64>,
    pub due_date: Option<String>,
    pub substitute: bool,
}

impl From<&Evaluation> for EvaluationSummary {
    fn from(e: &Evaluation) -> Self {
        Self {
            id: e.id.clone(),
            name: e.name.clone(),
            weight: e.weight,
            max_score: e.max_score,
            score: e.score,
            due_date: e.due_date.clone(),
            substitute: e.substitute,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GradesReport {
    pub discipline: String,
    pub code: String,
    pub average: f64,
    pub status: EnrollmentStatus,
    pub method: Option<AverageMethod>,
    pub min_average: f64,
    pub evaluations: Vec<EvaluationSummary>,
}

#[derive(Debug, Serialize)]
pub struct ScoreRecorded {
    pub discipline: String,
    pub evaluation: String,
    pub score: f64,
    pub average: f64,
    pub attendance: u8,
    pub status: EnrollmentStatus,
}

#[derive(Debug, Serialize)]
pub struct ProjectionReport {
    pub discipline: String,
    pub method: AverageMethod,
    pub desired_average: f64,
    pub average: f64,
    #[serde(flatten)]
    pub projection: Projection,
    /// Names of the evaluations still to be graded.
    pub pending: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub discipline: String,
    pub evaluation: String,
    pub simulated_score: f64,
    /// Whether `evaluation` named an existing evaluation.
    pub matched: bool,
    pub current_average: f64,
    pub simulated_average: f64,
}

fn grade_items(evaluations: &[Evaluation]) -> Vec<GradeItem> {
    evaluations.iter().map(Evaluation::to_grade_item).collect()
}

impl ToolCatalog {
    pub(crate) async fn grades(&self, discipline: &str) -> Result<GradesReport, ToolError> {
        let view = self.resolve(discipline).await?;
        let (method, evaluations) = match self.method_and_evaluations(&view).await {
            Ok((method, evaluations)) => (Some(method.kind), evaluations),
            Err(ToolError::NotFound(_)) => (None, Vec::new()),
            Err(err) => return Err(err),
        };
        Ok(GradesReport {
            discipline: view.course.name,
            code: view.course.code,
            average: view.enrollment.average,
            status: view.enrollment.status,
            method,
            min_average: view.enrollment.min_average,
            evaluations: evaluations.iter().map(EvaluationSummary::from).collect(),
        })
    }

    pub(crate) async fn record_score(&self, args: ScoreArgs) -> Result<ScoreRecorded, ToolError> {
        let view = self.resolve(&args.discipline).await?;
        let (_, evaluations) = self.method_and_evaluations(&view).await?;
        let evaluation = find_evaluation(&evaluations, &args.evaluation)?;
        check_score(args.score, evaluation.max_score)?;

        let enrollment = self
            .store
            .set_evaluation_score(&evaluation.id, Some(args.score))
            .await?;
        Ok(ScoreRecorded {
            discipline: view.course.name,
            evaluation: evaluation.name.clone(),
            score: args.score,
            average: enrollment.average,
            attendance: enrollment.attendance,
            status: enrollment.status,
        })
    }

    pub(crate) async fn project(&self, args: ProjectionArgs) -> Result<ProjectionReport, ToolError> {
        let view = self.resolve(&args.discipline).await?;
        let desired = args.desired_average.unwrap_or(view.enrollment.min_average);
        if !desired.is_finite() || !(0.0..=MAX_SCORE).contains(&desired) {
            return Err(ToolError::invalid(format!(
                "desired_average must be between 0 and {MAX_SCORE}, got {desired}"
            )));
        }

        let (method, evaluations) = self.method_and_evaluations(&view).await?;
        let (graded, pending): (Vec<GradeItem>, Vec<GradeItem>) =
            grade_items(&evaluations).into_iter().partition(is_graded);
        let pending: Vec<GradeItem> = pending.into_iter().filter(|i| !i.substitute).collect();

        Ok(ProjectionReport {
            discipline: view.course.name,
            method: method.kind,
            desired_average: desired,
            average: view.enrollment.average,
            projection: projection(&graded, &pending, desired, method.kind),
            pending: pending.iter().filter_map(|i| i.name.clone()).collect(),
        })
    }

    pub(crate) async fn simulate(&self, args: ScoreArgs) -> Result<SimulationReport, ToolError> {
        let view = self.resolve(&args.discipline).await?;
        let (method, evaluations) = self.method_and_evaluations(&view).await?;
        let target = find_evaluation(&evaluations, &args.evaluation).ok();
        check_score(args.score, target.map_or(MAX_SCORE, |e| e.max_score))?;

        let items = grade_items(&evaluations);
        Ok(SimulationReport {
            discipline: view.course.name,
            evaluation: target.map_or_else(|| args.evaluation.clone(), |e| e.name.clone()),
            simulated_score: args.score,
            matched: target.is_some(),
            current_average: average_for(method.kind, &items),
            simulated_average: simulate(
                &items,
                target.map_or(args.evaluation.as_str(), |e| e.id.as_str()),
                args.score,
                method.kind,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::{run, seeded_catalog};

    #[tokio::test]
    async fn consultar_media_reports_seeded_average() {
        let (catalog, _dir) = seeded_catalog().await;
        let report = run(&catalog, "consultar_media", r#"{"discipline":"Software Engineering"}"#).await;
        assert_eq!(report["average"], 7.5);
        assert_eq!(report["status"], "in_progress");
        assert_eq!(report["method"], "weighted");
        let evaluations = report["evaluations"].as_array().unwrap();
        assert_eq!(evaluations.len(), 3);
        assert_eq!(evaluations[2]["name"], "Prova 2");
        assert!(evaluations[2]["score"].is_null());
    }

    #[tokio::test]
    async fn lancar_nota_recomputes() {
        let (catalog, _dir) = seeded_catalog().await;
        let report = run(
            &catalog,
            "lancar_nota",
            r#"{"discipline":"SE101","evaluation":"prova 2","score":8}"#,
        )
        .await;
        assert_eq!(report["evaluation"], "Prova 2");
        assert_eq!(report["average"], 7.7);
        assert_eq!(report["status"], "approved");

        let after = run(&catalog, "consultar_media", r#"{"discipline":"SE101"}"#).await;
        assert_eq!(after["average"], 7.7);
    }

    #[tokio::test]
    async fn lancar_nota_rejects_out_of_range_scores() {
        let (catalog, _dir) = seeded_catalog().await;
        let output = catalog
            .execute("lancar_nota", r#"{"discipline":"SE101","evaluation":"Prova 2","score":11}"#)
            .await;
        assert!(output.is_error);
        assert!(output.content.contains("between 0 and 10"));
    }

    #[tokio::test]
    async fn lancar_nota_unknown_evaluation_lists_alternatives() {
        let (catalog, _dir) = seeded_catalog().await;
        let output = catalog
            .execute("lancar_nota", r#"{"discipline":"SE101","evaluation":"Prova 9","score":5}"#)
            .await;
        assert!(output.is_error);
        assert!(output.content.contains("Prova 1, Trabalho, Prova 2"), "{}", output.content);
    }

    #[tokio::test]
    async fn projetar_media_defaults_to_minimum() {
        let (catalog, _dir) = seeded_catalog().await;
        let report = run(&catalog, "projetar_media", r#"{"discipline":"SE101"}"#).await;
        // (5 * 5 - 22.5) / 2
        assert_eq!(report["desired_average"], 5.0);
        assert_eq!(report["required_score"], 1.25);
        assert_eq!(report["achievable"], true);
        assert_eq!(report["remaining_weight"], 2.0);
        assert_eq!(report["pending"], serde_json::json!(["Prova 2"]));
    }

    #[tokio::test]
    async fn projetar_media_can_be_unreachable() {
        let (catalog, _dir) = seeded_catalog().await;
        let report = run(
            &catalog,
            "projetar_media",
            r#"{"discipline":"Databases","desired_average":9.5}"#,
        )
        .await;
        // simple method: (9.5 * 3 - 15) / 1
        assert_eq!(report["required_score"], 13.5);
        assert_eq!(report["achievable"], false);
    }

    #[tokio::test]
    async fn projetar_media_without_pending_reports_current_average() {
        let (catalog, _dir) = seeded_catalog().await;
        let report = run(&catalog, "projetar_media", r#"{"discipline":"NET301"}"#).await;
        assert_eq!(report["remaining_weight"], 0.0);
        assert_eq!(report["achievable"], false);
        assert_eq!(report["current_average"], 7.5);
    }

    #[tokio::test]
    async fn simular_nota_fills_in_and_overrides() {
        let (catalog, _dir) = seeded_catalog().await;
        let fill = run(
            &catalog,
            "simular_nota",
            r#"{"discipline":"SE101","evaluation":"PROVA 2","score":10}"#,
        )
        .await;
        assert_eq!(fill["matched"], true);
        assert_eq!(fill["current_average"], 7.5);
        assert_eq!(fill["simulated_average"], 8.5);

        let overwrite = run(
            &catalog,
            "simular_nota",
            r#"{"discipline":"SE101","evaluation":"Prova 1","score":10}"#,
        )
        .await;
        assert_eq!(overwrite["simulated_average"], 9.5);

        // nothing is persisted
        let after = run(&catalog, "consultar_media", r#"{"discipline":"SE101"}"#).await;
        assert_eq!(after["average"], 7.5);
    }

    #[tokio::test]
    async fn simular_nota_unmatched_keeps_average() {
        let (catalog, _dir) = seeded_catalog().await;
        let report = run(
            &catalog,
            "simular_nota",
            r#"{"discipline":"SE101","evaluation":"Seminário","score":10}"#,
        )
        .await;
        assert_eq!(report["matched"], false);
        assert_eq!(report["simulated_average"], report["current_average"]);
    }

    #[tokio::test]
    async fn simular_nota_matches_padded_names() {
        let (catalog, _dir) = seeded_catalog().await;
        let report = run(
            &catalog,
            "simular_nota",
            r#"{"discipline":"SE101","evaluation":" Prova 2 ","score":10}"#,
        )
        .await;
        assert_eq!(report["matched"], true);
        assert_eq!(report["evaluation"], "Prova 2");
        assert_eq!(report["simulated_average"], 8.5);
    }

    #[tokio::test]
    async fn projetar_media_applies_graded_substitute() {
        let (catalog, _dir) = seeded_catalog().await;
        run(
            &catalog,
            "lancar_nota",
            r#"{"discipline":"MAT101","evaluation":"Reposição","score":8}"#,
        )
        .await;

        let report = run(
            &catalog,
            "projetar_media",
            r#"{"discipline":"MAT101","desired_average":5}"#,
        )
        .await;
        // P1 = 3 replaced by 8: (5 * 3 - (8 + 6)) / 1
        assert_eq!(report["method"], "substitution");
        assert_eq!(report["required_score"], 1.0);
        assert_eq!(report["remaining_weight"], 1.0);
        assert_eq!(report["pending"], serde_json::json!(["P3"]));
    }
}
