// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Aula academic assistant.
//!
//! This crate provides the trait definitions, error type, domain records and
//! LLM contract types shared by the storage, tool, client and agent crates.

pub mod error;
pub mod llm;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::AulaError;
pub use llm::{
    ChatMessage, FunctionCall, LlmRequest, LlmResponse, Role, TokenUsage, ToolCall, ToolChoice,
    ToolSpec,
};
pub use types::{AdapterType, HealthStatus};

pub use traits::{AcademicStore, ConversationStore, LlmClient, PluginAdapter, StorageAdapter};
