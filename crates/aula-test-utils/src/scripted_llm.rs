// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted LLM client for deterministic testing.
//!
//! Replies are popped from a FIFO queue; when it is empty a plain
//! "mock response" text is returned. Every request is recorded.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use aula_core::types::{AdapterType, HealthStatus};
use aula_core::{AulaError, LlmClient, LlmRequest, LlmResponse, PluginAdapter, ToolCall};

#[derive(Debug, Clone)]
enum Scripted {
    Reply(LlmResponse),
    Fail { status: u16, message: String },
}

pub struct ScriptedLlm {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    requests: Arc<Mutex<Vec<LlmRequest>>>,
    /// When set, every invocation requests this call (with a fresh id).
    always: Option<ToolCall>,
    delay: Option<Duration>,
}

impl ScriptedLlm {
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            always: None,
            delay: None,
        }
    }

    pub fn with_responses(responses: Vec<LlmResponse>) -> Self {
        Self {
            script: Arc::new(Mutex::new(
                responses.into_iter().map(Scripted::Reply).collect(),
            )),
            ..Self::new()
        }
    }

    /// A model that never stops calling `name`.
    pub fn always_calling(name: &str, arguments: &str) -> Self {
        Self {
            always: Some(ToolCall::function("call", name, arguments)),
            ..Self::new()
        }
    }

    /// Sleep before every reply.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn push(&self, response: LlmResponse) {
        self.script.lock().await.push_back(Scripted::Reply(response));
    }

    /// Queue a non-2xx failure.
    pub async fn push_failure(&self, status: u16, message: &str) {
        self.script.lock().await.push_back(Scripted::Fail {
            status,
            message: message.to_string(),
        });
    }

    /// Every request received so far.
    pub async fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn invocations(&self) -> usize {
        self.requests.lock().await.len()
    }

    /// A reply requesting one tool call.
    pub fn tool_call(id: &str, name: &str, arguments: &str) -> LlmResponse {
        LlmResponse::tool_calls(vec![ToolCall::function(id, name, arguments)])
    }
}

impl Default for ScriptedLlm {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for ScriptedLlm {
    fn name(&self) -> &str {
        "scripted-llm"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Llm
    }

    async fn health_check(&self) -> Result<HealthStatus, AulaError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), AulaError> {
        Ok(())
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn invoke(&self, request: LlmRequest) -> Result<LlmResponse, AulaError> {
        let invocation = {
            let mut requests = self.requests.lock().await;
            requests.push(request);
            requests.len()
        };
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(call) = &self.always {
            let mut call = call.clone();
            call.id = format!("call_{invocation}");
            return Ok(LlmResponse::tool_calls(vec![call]));
        }

        match self.script.lock().await.pop_front() {
            Some(Scripted::Reply(response)) => Ok(response),
            Some(Scripted::Fail { status, message }) => Err(AulaError::Provider {
                message: format!("LLM invoke failed: {status}: {message}"),
                status: Some(status),
                source: None,
            }),
            None => Ok(LlmResponse::text("mock response")),
        }
    }
}
