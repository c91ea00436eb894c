// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The tool catalog: one student, one period, a fixed set of typed tools.

use std::sync::Arc;

use aula_core::types::EnrollmentView;
use aula_core::{AcademicStore, ToolSpec};
use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::args::{
    AbsenceArgs, DisciplineArgs, NoArgs, ProjectionArgs, ScheduleArgs, ScoreArgs, parse_args,
};
use crate::error::ToolError;
use crate::tool::{ToolName, tool_specs};

/// Source of "now" for date-dependent tools.
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Output of a tool execution, ready to be placed in a tool-role message.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    /// JSON-serialized result, or `{"error": "..."}`.
    pub content: String,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn success(value: &Value) -> Self {
        Self {
            content: value.to_string(),
            is_error: false,
        }
    }

    pub fn error(message: impl std::fmt::Display) -> Self {
        Self {
            content: json!({ "error": message.to_string() }).to_string(),
            is_error: true,
        }
    }
}

/// Tools bound to one student and academic period.
///
/// Every handler reads and writes only that student's records. Handlers never
/// fail the caller: [`ToolCatalog::execute`] returns errors as values.
#[derive(Clone)]
pub struct ToolCatalog {
    pub(crate) store: Arc<dyn AcademicStore>,
    student_id: String,
    period: String,
    clock: Clock,
}

impl ToolCatalog {
    pub fn new(
        store: Arc<dyn AcademicStore>,
        student_id: impl Into<String>,
        period: impl Into<String>,
    ) -> Self {
        Self {
            store,
            student_id: student_id.into(),
            period: period.into(),
            clock: Arc::new(|| chrono::Local::now().naive_local()),
        }
    }

    /// Replace the wall clock, e.g. with a fixed instant in tests.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    pub fn period(&self) -> &str {
        &self.period
    }

    pub(crate) fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }

    /// Name and schema of every tool, sorted by name.
    pub fn specs(&self) -> Vec<ToolSpec> {
        tool_specs()
    }

    /// Run the tool `name` with its JSON argument string.
    pub async fn execute(&self, name: &str, arguments: &str) -> ToolOutput {
        info!(tool = name, student_id = %self.student_id, "executing tool");
        match self.dispatch(name, arguments).await {
            Ok(value) => {
                debug!(tool = name, "tool succeeded");
                ToolOutput::success(&value)
            }
            Err(err) => {
                warn!(tool = name, error = %err, "tool returned an error");
                ToolOutput::error(err)
            }
        }
    }

    async fn dispatch(&self, name: &str, arguments: &str) -> Result<Value, ToolError> {
        let tool: ToolName = name
            .parse()
            .map_err(|_| ToolError::UnknownTool(name.to_string()))?;

        match tool {
            ToolName::ListarDisciplinas => {
                parse_args::<NoArgs>(arguments)?;
                to_json(self.list_disciplines().await?)
            }
            ToolName::ConsultarMedia => {
                let args: DisciplineArgs = parse_args(arguments)?;
                to_json(self.grades(&args.discipline).await?)
            }
            ToolName::ConsultarFrequencia => {
                let args: DisciplineArgs = parse_args(arguments)?;
                to_json(self.attendance(&args.discipline).await?)
            }
            ToolName::LancarNota => {
                let args: ScoreArgs = parse_args(arguments)?;
                to_json(self.record_score(args).await?)
            }
            ToolName::RegistrarFalta => {
                let args: AbsenceArgs = parse_args(arguments)?;
                to_json(self.record_absence(args).await?)
            }
            ToolName::ProjetarMedia => {
                let args: ProjectionArgs = parse_args(arguments)?;
                to_json(self.project(args).await?)
            }
            ToolName::SimularNota => {
                let args: ScoreArgs = parse_args(arguments)?;
                to_json(self.simulate(args).await?)
            }
            ToolName::ConsultarHorarios => {
                let args: ScheduleArgs = parse_args(arguments)?;
                to_json(self.schedule(args).await?)
            }
            ToolName::ProximaAula => {
                parse_args::<NoArgs>(arguments)?;
                to_json(self.next_class().await?)
            }
            ToolName::SituacaoGeral => {
                parse_args::<NoArgs>(arguments)?;
                to_json(self.overview().await?)
            }
        }
    }

    /// Enrollments of the catalog's student in the catalog's period.
    pub(crate) async fn enrollments(&self) -> Result<Vec<EnrollmentView>, ToolError> {
        Ok(self
            .store
            .enrollments_for_student(&self.student_id, Some(&self.period))
            .await?)
    }

    /// Find the enrollment a discipline argument refers to.
    ///
    /// Exact code or name (case-insensitive) wins; otherwise the argument must
    /// be a substring of exactly one course name or code.
    pub(crate) async fn resolve(&self, discipline: &str) -> Result<EnrollmentView, ToolError> {
        let wanted = discipline.trim().to_lowercase();
        if wanted.is_empty() {
            return Err(ToolError::invalid("discipline must not be empty"));
        }

        let mut views = self.enrollments().await?;
        let exact = views.iter().position(|v| {
            v.course.code.to_lowercase() == wanted || v.course.name.to_lowercase() == wanted
        });
        if let Some(index) = exact {
            return Ok(views.swap_remove(index));
        }

        let mut partial: Vec<EnrollmentView> = views
            .into_iter()
            .filter(|v| {
                v.course.code.to_lowercase().contains(&wanted)
                    || v.course.name.to_lowercase().contains(&wanted)
            })
            .collect();
        match partial.len() {
            1 => Ok(partial.remove(0)),
            0 => Err(ToolError::NotFound(format!(
                "no course matching '{discipline}' in period {}",
                self.period
            ))),
            _ => {
                let names: Vec<&str> = partial.iter().map(|v| v.course.name.as_str()).collect();
                Err(ToolError::invalid(format!(
                    "'{discipline}' matches several courses: {}",
                    names.join(", ")
                )))
            }
        }
    }
}

fn to_json<T: Serialize>(value: T) -> Result<Value, ToolError> {
    serde_json::to_value(value)
        .map_err(|e| ToolError::Backend(aula_core::AulaError::Internal(e.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::seeded_catalog;

    fn parse(output: &ToolOutput) -> Value {
        serde_json::from_str(&output.content).unwrap()
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error_value() {
        let (catalog, _dir) = seeded_catalog().await;
        let output = catalog.execute("apagar_historico", "{}").await;
        assert!(output.is_error);
        assert_eq!(parse(&output)["error"], "function 'apagar_historico' is not mapped");
    }

    #[tokio::test]
    async fn malformed_arguments_are_an_error_value() {
        let (catalog, _dir) = seeded_catalog().await;
        let output = catalog.execute("consultar_media", "{not json").await;
        assert!(output.is_error);
        assert!(parse(&output)["error"].as_str().unwrap().starts_with("invalid arguments"));
    }

    #[tokio::test]
    async fn discipline_matches_code_name_and_substring() {
        let (catalog, _dir) = seeded_catalog().await;
        assert_eq!(catalog.resolve("se101").await.unwrap().course.code, "SE101");
        assert_eq!(
            catalog.resolve("SOFTWARE ENGINEERING").await.unwrap().course.code,
            "SE101"
        );
        assert_eq!(catalog.resolve("calculus").await.unwrap().course.code, "MAT101");
        assert!(matches!(
            catalog.resolve("Astronomy").await.unwrap_err(),
            ToolError::NotFound(_)
        ));
        assert!(matches!(
            catalog.resolve("   ").await.unwrap_err(),
            ToolError::InvalidArguments(_)
        ));
    }

    #[tokio::test]
    async fn ambiguous_discipline_is_rejected() {
        let (catalog, _dir) = seeded_catalog().await;
        // "e" appears in several course names.
        let err = catalog.resolve("e").await.unwrap_err();
        assert!(err.to_string().contains("several courses"), "got {err}");
    }

    #[tokio::test]
    async fn other_students_records_are_invisible() {
        let (catalog, _dir) = seeded_catalog().await;
        let stranger = ToolCatalog::new(catalog.store.clone(), "someone-else", catalog.period());
        let output = stranger.execute("consultar_media", r#"{"discipline":"SE101"}"#).await;
        assert!(output.is_error);
        let listed = parse(&stranger.execute("listar_disciplinas", "{}").await);
        assert_eq!(listed["disciplines"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn other_periods_are_invisible() {
        let (catalog, _dir) = seeded_catalog().await;
        let past = ToolCatalog::new(catalog.store.clone(), catalog.student_id(), "2020.1");
        assert!(past.execute("consultar_media", r#"{"discipline":"SE101"}"#).await.is_error);
    }

    #[test]
    fn error_output_is_json() {
        let output = ToolOutput::error("boom");
        assert_eq!(output.content, r#"{"error":"boom"}"#);
        assert!(output.is_error);
    }
}
