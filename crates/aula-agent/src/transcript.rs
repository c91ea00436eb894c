// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory message list of a turn.

use aula_core::types::Message;
use aula_core::{ChatMessage, LlmRequest, ToolChoice, ToolSpec};

/// Messages sent to the model, split into what is already persisted and what
/// the current turn added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    persisted: usize,
}

impl Transcript {
    /// `[system prompt] + history`, all counted as persisted.
    pub fn new(system_prompt: &str, history: &[Message]) -> Self {
        let messages: Vec<ChatMessage> = std::iter::once(ChatMessage::system(system_prompt))
            .chain(history.iter().map(Message::to_chat))
            .collect();
        let persisted = messages.len();
        Self {
            messages,
            persisted,
        }
    }

    pub fn with(mut self, message: ChatMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Messages added since [`Transcript::new`].
    pub fn unpersisted(&self) -> &[ChatMessage] {
        &self.messages[self.persisted..]
    }

    pub fn request(&self, tools: &[ToolSpec]) -> LlmRequest {
        LlmRequest {
            messages: self.messages.clone(),
            tools: tools.to_vec(),
            tool_choice: ToolChoice::Auto,
        }
    }
}
