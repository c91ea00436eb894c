// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed tool arguments.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::ToolError;

/// Arguments of tools that take none. Extra keys are ignored.
#[derive(Debug, Deserialize)]
pub struct NoArgs {}

#[derive(Debug, Deserialize)]
pub struct DisciplineArgs {
    pub discipline: String,
}

#[derive(Debug, Deserialize)]
pub struct ScoreArgs {
    pub discipline: String,
    pub evaluation: String,
    pub score: f64,
}

#[derive(Debug, Deserialize)]
pub struct AbsenceArgs {
    pub discipline: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub justified: bool,
    #[serde(default)]
    pub justification: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectionArgs {
    pub discipline: String,
    #[serde(default)]
    pub desired_average: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleArgs {
    #[serde(default)]
    pub day: Option<String>,
}

/// Parse the model's JSON argument string. An empty string means `{}`.
pub fn parse_args<T: DeserializeOwned>(raw: &str) -> Result<T, ToolError> {
    let raw = raw.trim();
    let raw = if raw.is_empty() { "{}" } else { raw };
    serde_json::from_str(raw).map_err(|e| ToolError::invalid(e.to_string()))
}
