// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System prompt loading.

use aula_config::AgentConfig;
use tracing::{info, warn};

/// Built-in persona used when no prompt is configured.
pub fn default_system_prompt(agent_name: &str) -> String {
    format!(
        "You are {agent_name}, an academic assistant for a university student. \
         You help with courses, grades, attendance and the class schedule of the current period.\n\
         Always call the available tools for anything involving the student's academic data, \
         including reading or changing it. Never guess grades, averages, absences or class times.\n\
         If a tool returns an error, tell the student what went wrong and ask for the missing detail.\n\
         Reply in the student's language and keep answers short."
    )
}

/// Loads the system prompt following config priority: file > inline > default.
pub async fn load_system_prompt(config: &AgentConfig) -> String {
    if let Some(ref file_path) = config.system_prompt_file {
        match tokio::fs::read_to_string(file_path).await {
            Ok(content) => {
                let trimmed = content.trim();
                if !trimmed.is_empty() {
                    info!(path = file_path.as_str(), "loaded system prompt from file");
                    return trimmed.to_string();
                }
                warn!(path = file_path.as_str(), "system prompt file is empty, falling back");
            }
            Err(e) => {
                warn!(
                    path = file_path.as_str(),
                    error = %e,
                    "failed to read system prompt file, falling back"
                );
            }
        }
    }

    if let Some(ref prompt) = config.system_prompt
        && !prompt.trim().is_empty()
    {
        return prompt.clone();
    }

    default_system_prompt(&config.name)
}
