// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `aula history` command implementation.
//!
//! Reads storage directly, so no API key is needed.

use aula_config::model::AulaConfig;
use aula_core::types::{Conversation, Message};
use aula_core::{AulaError, ConversationStore, Role, StorageAdapter};
use colored::Colorize;

use crate::runtime::open_storage;

/// Runs `aula history`.
pub async fn run_history(
    config: AulaConfig,
    user: &str,
    conversation: Option<&str>,
    json: bool,
) -> Result<(), AulaError> {
    let storage = open_storage(&config).await?;
    let result = match conversation {
        Some(id) => transcript(storage.as_ref(), user, id).await.and_then(|messages| {
            if json {
                print_json(&messages)
            } else {
                print_transcript(&messages);
                Ok(())
            }
        }),
        None => storage.list_conversations(user).await.and_then(|conversations| {
            if json {
                print_json(&conversations)
            } else {
                print_conversations(&conversations);
                Ok(())
            }
        }),
    };
    storage.close().await?;
    result
}

/// Messages of `conversation_id`, provided `user` owns it.
async fn transcript(
    store: &dyn ConversationStore,
    user: &str,
    conversation_id: &str,
) -> Result<Vec<Message>, AulaError> {
    match store.get_conversation(conversation_id).await? {
        Some(conversation) if conversation.user_id == user => {
            store.list_messages(&conversation.id).await
        }
        _ => Err(AulaError::NotFound {
            entity: "conversation",
            key: conversation_id.to_string(),
        }),
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), AulaError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| AulaError::Internal(format!("failed to render JSON: {e}")))?;
    println!("{rendered}");
    Ok(())
}

fn print_conversations(conversations: &[Conversation]) {
    if conversations.is_empty() {
        println!("{}", "no conversations".dimmed());
        return;
    }
    for conversation in conversations {
        println!(
            "{}  {}  {}",
            conversation.id.cyan(),
            conversation.updated_at.dimmed(),
            conversation.title
        );
    }
}

/// One line per message; tool traffic is dimmed.
pub fn print_transcript(messages: &[Message]) {
    for message in messages {
        println!("{}", render_line(message));
    }
}

fn render_line(message: &Message) -> String {
    let text = message.content.as_deref().unwrap_or_default();
    match message.role {
        Role::User => format!("{} {text}", "user".green().bold()),
        Role::Assistant if message.tool_calls.is_some() => {
            let names: Vec<&str> = message
                .tool_calls
                .iter()
                .flatten()
                .map(|call| call.function.name.as_str())
                .collect();
            format!("{}", format!("assistant -> {}", names.join(", ")).dimmed())
        }
        Role::Assistant => format!("{} {text}", "assistant".blue().bold()),
        Role::Tool => format!(
            "{}",
            format!(
                "tool[{}] {text}",
                message.tool_call_id.as_deref().unwrap_or("?")
            )
            .dimmed()
        ),
        Role::System => format!("{}", format!("system {text}").dimmed()),
    }
}
