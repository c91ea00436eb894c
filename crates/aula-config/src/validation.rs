// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::AulaConfig;

/// Upper bound for `agent.max_tool_rounds`.
pub const MAX_TOOL_ROUNDS_LIMIT: usize = 32;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every problem instead of stopping at the first one.
pub fn validate_config(config: &AulaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if !(1..=MAX_TOOL_ROUNDS_LIMIT).contains(&config.agent.max_tool_rounds) {
        fail(format!(
            "agent.max_tool_rounds must be between 1 and {MAX_TOOL_ROUNDS_LIMIT}, got {}",
            config.agent.max_tool_rounds
        ));
    }

    if config.agent.call_timeout_secs == 0 {
        fail("agent.call_timeout_secs must be greater than zero".to_string());
    }

    if !LOG_LEVELS.contains(&config.agent.log_level.to_lowercase().as_str()) {
        fail(format!(
            "agent.log_level `{}` is not one of {}",
            config.agent.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    let base_url = config.llm.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        fail(format!(
            "llm.base_url `{base_url}` must start with http:// or https://"
        ));
    }

    if config.llm.model.trim().is_empty() {
        fail("llm.model must not be empty".to_string());
    }

    if config.llm.max_tokens == 0 {
        fail("llm.max_tokens must be greater than zero".to_string());
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if config.academic.default_period.trim().is_empty() {
        fail("academic.default_period must not be empty".to_string());
    }

    if !(0.0..=10.0).contains(&config.academic.min_average) {
        fail(format!(
            "academic.min_average must be between 0 and 10, got {}",
            config.academic.min_average
        ));
    }

    if !(0.0..=100.0).contains(&config.academic.min_attendance) {
        fail(format!(
            "academic.min_attendance must be between 0 and 100, got {}",
            config.academic.min_attendance
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
