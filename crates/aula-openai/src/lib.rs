// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible LLM client for the Aula assistant.
//!
//! [`OpenAiProvider`] implements [`LlmClient`] over the chat-completions
//! tool-calling contract. Any endpoint speaking that contract works through
//! `llm.base_url`.

pub mod client;
pub mod types;

use async_trait::async_trait;
use aula_config::LlmConfig;
use aula_core::types::{AdapterType, HealthStatus};
use aula_core::{
    AulaError, ChatMessage, LlmClient, LlmRequest, LlmResponse, PluginAdapter, Role, TokenUsage,
    ToolChoice, ToolSpec,
};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::client::OpenAiClient;
use crate::types::{ChatRequest, ChatResponse, FunctionDefinition, ToolDefinition};

/// Environment variable consulted when `llm.api_key` is unset.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Chat-completions provider implementing [`LlmClient`].
///
/// API key resolution order: config -> `OPENAI_API_KEY` env var -> error.
pub struct OpenAiProvider {
    client: OpenAiClient,
    model: String,
    max_tokens: u32,
}

impl OpenAiProvider {
    pub fn new(config: &LlmConfig) -> Result<Self, AulaError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = OpenAiClient::new(&api_key, &config.base_url, config.max_retries)?;
        info!(model = %config.model, endpoint = client.endpoint(), "LLM client initialized");
        Ok(Self {
            client,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn to_chat_request(&self, request: &LlmRequest) -> ChatRequest {
        let (tools, tool_choice) = if request.tools.is_empty() {
            (None, None)
        } else {
            (
                Some(request.tools.iter().map(to_tool_definition).collect()),
                Some(tool_choice_value(&request.tool_choice, &request.tools)),
            )
        };
        ChatRequest {
            model: self.model.clone(),
            messages: request.messages.clone(),
            tools,
            tool_choice,
            max_tokens: self.max_tokens,
        }
    }
}

#[async_trait]
impl PluginAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Llm
    }

    async fn health_check(&self) -> Result<HealthStatus, AulaError> {
        // Avoid spending tokens on health checks.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), AulaError> {
        debug!("LLM client shutting down");
        Ok(())
    }
}

#[async_trait]
impl LlmClient for OpenAiProvider {
    async fn invoke(&self, request: LlmRequest) -> Result<LlmResponse, AulaError> {
        let chat_request = self.to_chat_request(&request);
        debug!(
            messages = chat_request.messages.len(),
            tools = request.tools.len(),
            "invoking model"
        );
        let response = self.client.complete(&chat_request).await?;
        into_llm_response(response)
    }
}

fn to_tool_definition(spec: &ToolSpec) -> ToolDefinition {
    ToolDefinition {
        tool_type: "function".to_string(),
        function: FunctionDefinition {
            name: spec.name.clone(),
            description: spec.description.clone(),
            parameters: spec.parameters.clone(),
        },
    }
}

/// Wire value of a tool choice. `Required` with a single tool names it.
fn tool_choice_value(choice: &ToolChoice, tools: &[ToolSpec]) -> Value {
    let named = |name: &str| json!({ "type": "function", "function": { "name": name } });
    match choice {
        ToolChoice::Auto => json!("auto"),
        ToolChoice::None => json!("none"),
        ToolChoice::Required => match tools {
            [only] => named(&only.name),
            _ => json!("required"),
        },
        ToolChoice::Function(name) => named(name),
    }
}

fn into_llm_response(response: ChatResponse) -> Result<LlmResponse, AulaError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AulaError::Provider {
            message: "LLM response contained no choices".to_string(),
            status: None,
            source: None,
        })?;

    let tool_calls = choice.message.tool_calls.filter(|calls| !calls.is_empty());
    Ok(LlmResponse {
        message: ChatMessage {
            role: Role::Assistant,
            content: choice.message.content,
            tool_calls,
            tool_call_id: None,
        },
        finish_reason: choice.finish_reason,
        usage: response.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
        }),
    })
}

/// Resolves the API key from config or environment.
fn resolve_api_key(config_key: &Option<String>) -> Result<String, AulaError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }

    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            AulaError::Config(format!(
                "LLM API key not found. Set llm.api_key in config or {API_KEY_ENV} environment variable."
            ))
        })
}
