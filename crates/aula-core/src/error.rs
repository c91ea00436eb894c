// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Aula academic assistant.

use std::time::Duration;

use thiserror::Error;

/// The primary error type used across adapter traits and the orchestration loop.
///
/// Every variant is fatal to the turn that produced it. Tool-level failures
/// never surface as an `AulaError`; the tool catalog turns them into values
/// the model can read.
#[derive(Debug, Error)]
pub enum AulaError {
    /// Configuration errors (invalid TOML, missing API key, bad header values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// LLM client errors. `status` carries the HTTP status of a non-2xx reply.
    #[error("provider error: {message}")]
    Provider {
        message: String,
        status: Option<u16>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An external call did not finish in time.
    #[error("{operation} timed out after {duration:?}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// A record the caller referenced does not exist.
    #[error("{entity} `{key}` not found")]
    NotFound { entity: &'static str, key: String },

    /// The model kept requesting tools past the configured round bound.
    #[error("assistant could not complete the request: still calling tools after {rounds} rounds")]
    ToolRoundsExceeded { rounds: usize },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AulaError {
    /// Shorthand for a storage error built from any error value.
    pub fn storage(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        AulaError::Storage {
            source: source.into(),
        }
    }

    /// HTTP status of a failed provider call, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            AulaError::Provider { status, .. } => *status,
            _ => None,
        }
    }
}
