// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LLM client trait.

use async_trait::async_trait;

use crate::error::AulaError;
use crate::llm::{LlmRequest, LlmResponse};
use crate::traits::adapter::PluginAdapter;

/// A chat model with tool calling.
#[async_trait]
pub trait LlmClient: PluginAdapter {
    /// Sends one request and returns the model's reply.
    ///
    /// Non-2xx replies are errors carrying the HTTP status.
    async fn invoke(&self, request: LlmRequest) -> Result<LlmResponse, AulaError>;
}
