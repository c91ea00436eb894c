// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation and transcript persistence.

use async_trait::async_trait;

use crate::error::AulaError;
use crate::llm::ChatMessage;
use crate::traits::storage::StorageAdapter;
use crate::types::{Conversation, Message};

/// Persistence of conversations and their ordered transcripts.
#[async_trait]
pub trait ConversationStore: StorageAdapter {
    /// Creates a conversation for `user_id` and returns its id.
    async fn create_conversation(&self, user_id: &str) -> Result<String, AulaError>;

    async fn get_conversation(&self, id: &str) -> Result<Option<Conversation>, AulaError>;

    /// Conversations of a user, most recently updated first.
    async fn list_conversations(&self, user_id: &str) -> Result<Vec<Conversation>, AulaError>;

    /// Appends a message and bumps the conversation's `updated_at`.
    ///
    /// Returns the new message id.
    async fn append_message(
        &self,
        conversation_id: &str,
        message: &ChatMessage,
    ) -> Result<String, AulaError>;

    /// Appends several messages in order.
    ///
    /// Backends with transactions should write the batch atomically; the
    /// default appends one message at a time.
    async fn append_messages(
        &self,
        conversation_id: &str,
        messages: &[ChatMessage],
    ) -> Result<Vec<String>, AulaError> {
        let mut ids = Vec::with_capacity(messages.len());
        for message in messages {
            ids.push(self.append_message(conversation_id, message).await?);
        }
        Ok(ids)
    }

    /// The full transcript in creation order.
    async fn list_messages(&self, conversation_id: &str) -> Result<Vec<Message>, AulaError>;
}
