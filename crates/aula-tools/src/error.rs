// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool-level failures.
//!
//! None of these abort a turn: the catalog converts every one of them into a
//! `{"error": "..."}` value that is handed back to the model.

use aula_calc::CalcError;
use aula_core::AulaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    /// The model asked for a tool the catalog does not have.
    #[error("function '{0}' is not mapped")]
    UnknownTool(String),

    /// Malformed JSON, missing fields or out-of-range values.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Domain(#[from] CalcError),

    #[error(transparent)]
    Backend(#[from] AulaError),
}

impl ToolError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        ToolError::InvalidArguments(message.into())
    }
}
