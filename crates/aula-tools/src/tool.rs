// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool identifiers and the schemas advertised to the model.

use aula_core::ToolSpec;
use serde_json::{Value, json};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Every tool the catalog can execute.
///
/// The string form is the name the model calls the tool by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ToolName {
    ListarDisciplinas,
    ConsultarMedia,
    ConsultarFrequencia,
    LancarNota,
    RegistrarFalta,
    ProjetarMedia,
    SimularNota,
    ConsultarHorarios,
    ProximaAula,
    SituacaoGeral,
}

fn discipline_param() -> Value {
    json!({
        "type": "string",
        "description": "Course name or code, e.g. \"Software Engineering\" or \"SE101\""
    })
}

fn no_params() -> Value {
    json!({ "type": "object", "properties": {} })
}

impl ToolName {
    pub fn description(self) -> &'static str {
        match self {
            ToolName::ListarDisciplinas => {
                "List the student's courses in the current period with average, attendance and status"
            }
            ToolName::ConsultarMedia => {
                "Get the current average, status, evaluation method and evaluations of one course"
            }
            ToolName::ConsultarFrequencia => {
                "Get attendance for one course: absences, attendance percentage, absence limit and remaining absences"
            }
            ToolName::LancarNota => {
                "Record the score obtained in one evaluation of a course and return the recomputed average and status"
            }
            ToolName::RegistrarFalta => {
                "Record one absence in a course (defaults to today) and return the recomputed attendance"
            }
            ToolName::ProjetarMedia => {
                "Compute the score needed on the remaining evaluations of a course to reach a desired average"
            }
            ToolName::SimularNota => {
                "Simulate the course average if one evaluation had a given score, without saving anything"
            }
            ToolName::ConsultarHorarios => {
                "List the student's weekly class schedule, optionally for a single weekday"
            }
            ToolName::ProximaAula => "Find the student's next class from now",
            ToolName::SituacaoGeral => {
                "Overview of every course in the period with counts by status and the courses at risk"
            }
        }
    }

    /// JSON Schema of the tool's arguments object.
    pub fn parameters_schema(self) -> Value {
        match self {
            ToolName::ListarDisciplinas | ToolName::ProximaAula | ToolName::SituacaoGeral => {
                no_params()
            }
            ToolName::ConsultarMedia | ToolName::ConsultarFrequencia => json!({
                "type": "object",
                "properties": { "discipline": discipline_param() },
                "required": ["discipline"]
            }),
            ToolName::LancarNota | ToolName::SimularNota => json!({
                "type": "object",
                "properties": {
                    "discipline": discipline_param(),
                    "evaluation": {
                        "type": "string",
                        "description": "Evaluation name (case-insensitive) or id, e.g. \"Prova 2\""
                    },
                    "score": {
                        "type": "number",
                        "minimum": 0,
                        "description": "Score on the evaluation's scale (usually 0 to 10)"
                    }
                },
                "required": ["discipline", "evaluation", "score"]
            }),
            ToolName::RegistrarFalta => json!({
                "type": "object",
                "properties": {
                    "discipline": discipline_param(),
                    "date": {
                        "type": "string",
                        "description": "Date of the absence as YYYY-MM-DD; defaults to today"
                    },
                    "justified": {
                        "type": "boolean",
                        "description": "Whether the absence is justified"
                    },
                    "justification": {
                        "type": "string",
                        "description": "Reason given for a justified absence"
                    }
                },
                "required": ["discipline"]
            }),
            ToolName::ProjetarMedia => json!({
                "type": "object",
                "properties": {
                    "discipline": discipline_param(),
                    "desired_average": {
                        "type": "number",
                        "minimum": 0,
                        "maximum": 10,
                        "description": "Target average; defaults to the course's minimum passing average"
                    }
                },
                "required": ["discipline"]
            }),
            ToolName::ConsultarHorarios => json!({
                "type": "object",
                "properties": {
                    "day": {
                        "type": "string",
                        "description": "Weekday name (e.g. \"monday\", \"segunda\") or number 0-6 with 0 = Sunday"
                    }
                }
            }),
        }
    }

    pub fn spec(self) -> ToolSpec {
        ToolSpec {
            name: self.to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// Specs of every tool, sorted by name.
pub fn tool_specs() -> Vec<ToolSpec> {
    let mut specs: Vec<ToolSpec> = ToolName::iter().map(ToolName::spec).collect();
    specs.sort_by(|a, b| a.name.cmp(&b.name));
    specs
}
