// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for an OpenAI-compatible chat-completions endpoint.
//!
//! Provides [`OpenAiClient`] which handles bearer authentication, request
//! serialization, and retry of transient errors (429, 500, 503).

use std::time::Duration;

use aula_core::AulaError;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, ChatRequest, ChatResponse};

/// Upper bound for a single HTTP exchange. The orchestration loop applies its
/// own, usually shorter, per-call timeout on top.
const HTTP_TIMEOUT: Duration = Duration::from_secs(300);

/// Pause before retrying a transient error.
const RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    endpoint: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl OpenAiClient {
    /// Creates a client for `<base_url>/chat/completions`.
    pub fn new(api_key: &str, base_url: &str, max_retries: u32) -> Result<Self, AulaError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|e| AulaError::Config(format!("invalid API key header value: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| AulaError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                status: None,
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            max_retries,
            retry_delay: RETRY_DELAY,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[cfg(test)]
    pub(crate) fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Sends one completion request.
    ///
    /// Transient statuses are retried up to `max_retries` times; any other
    /// non-2xx reply fails with the status kept on the error.
    pub async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AulaError> {
        let mut attempt = 0;
        loop {
            let response = self
                .client
                .post(&self.endpoint)
                .json(request)
                .send()
                .await
                .map_err(|e| AulaError::Provider {
                    message: format!("HTTP request failed: {e}"),
                    status: None,
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, "completion response received");

            if status.is_success() {
                let body = response.text().await.map_err(|e| AulaError::Provider {
                    message: format!("failed to read response body: {e}"),
                    status: Some(status.as_u16()),
                    source: Some(Box::new(e)),
                })?;
                return serde_json::from_str(&body).map_err(|e| AulaError::Provider {
                    message: format!("failed to parse API response: {e}"),
                    status: Some(status.as_u16()),
                    source: Some(Box::new(e)),
                });
            }

            let body = response.text().await.unwrap_or_default();
            if is_transient_error(status) && attempt < self.max_retries {
                attempt += 1;
                warn!(status = %status, attempt, "transient error, retrying completion request");
                tokio::time::sleep(self.retry_delay).await;
                continue;
            }

            return Err(invoke_failed(status, &body));
        }
    }
}

/// Error for a non-2xx reply: `LLM invoke failed: <status> <reason>: <detail>`.
fn invoke_failed(status: StatusCode, body: &str) -> AulaError {
    let detail = serde_json::from_str::<ApiErrorResponse>(body)
        .map(|api| match api.error.error_type {
            Some(kind) => format!("{kind}: {}", api.error.message),
            None => api.error.message,
        })
        .unwrap_or_else(|_| body.to_string());
    AulaError::Provider {
        message: format!("LLM invoke failed: {status}: {detail}"),
        status: Some(status.as_u16()),
        source: None,
    }
}

fn is_transient_error(status: StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}
