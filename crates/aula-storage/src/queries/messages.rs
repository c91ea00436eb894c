// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transcript persistence.
//!
//! Messages are ordered by creation time with the insertion sequence as the
//! tie-breaker, so a batch written in one transaction keeps its order.

use aula_core::AulaError;
use aula_core::llm::{ChatMessage, Role, ToolCall};
use aula_core::types::Message;
use rusqlite::types::Type;
use rusqlite::{Transaction, params};

use crate::database::{Database, now_iso};
use crate::queries::parse_column;

struct NewRow {
    id: String,
    role: Role,
    content: Option<String>,
    tool_calls: Option<String>,
    tool_call_id: Option<String>,
}

impl NewRow {
    fn from_chat(message: &ChatMessage) -> Result<Self, AulaError> {
        let tool_calls = message
            .tool_calls
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(AulaError::storage)?;
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: message.role,
            content: message.content.clone(),
            tool_calls,
            tool_call_id: message.tool_call_id.clone(),
        })
    }
}

fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    let tool_calls: Option<String> = row.get(4)?;
    let tool_calls = tool_calls
        .map(|raw| serde_json::from_str::<Vec<ToolCall>>(&raw))
        .transpose()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;
    Ok(Message {
        id: row.get(0)?,
        conversation_id: row.get(1)?,
        role: parse_column(row, 2)?,
        content: row.get(3)?,
        tool_calls,
        tool_call_id: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Inserts the rows and bumps the conversation; `false` if it does not exist.
fn insert_rows(
    tx: &Transaction<'_>,
    conversation_id: &str,
    rows: &[NewRow],
) -> rusqlite::Result<bool> {
    let now = now_iso();
    let touched = tx.execute(
        "UPDATE conversations SET updated_at = ?1 WHERE id = ?2",
        params![now, conversation_id],
    )?;
    if touched == 0 {
        return Ok(false);
    }

    let mut stmt = tx.prepare(
        "INSERT INTO messages (id, conversation_id, role, content, tool_calls, tool_call_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    for row in rows {
        stmt.execute(params![
            row.id,
            conversation_id,
            row.role.as_ref(),
            row.content,
            row.tool_calls,
            row.tool_call_id,
            now,
        ])?;
    }
    Ok(true)
}

/// Append messages in order, atomically, and bump the conversation's `updated_at`.
///
/// Returns the new message ids.
pub async fn append_messages(
    db: &Database,
    conversation_id: &str,
    messages: &[ChatMessage],
) -> Result<Vec<String>, AulaError> {
    let rows = messages
        .iter()
        .map(NewRow::from_chat)
        .collect::<Result<Vec<_>, _>>()?;
    let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
    let conversation = conversation_id.to_string();

    let found = db
        .connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let found = insert_rows(&tx, &conversation, &rows)?;
            tx.commit()?;
            Ok(found)
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    if !found {
        return Err(AulaError::NotFound {
            entity: "conversation",
            key: conversation_id.to_string(),
        });
    }
    Ok(ids)
}

/// Append one message; see [`append_messages`].
pub async fn append_message(
    db: &Database,
    conversation_id: &str,
    message: &ChatMessage,
) -> Result<String, AulaError> {
    let mut ids = append_messages(db, conversation_id, std::slice::from_ref(message)).await?;
    ids.pop()
        .ok_or_else(|| AulaError::Internal("message insert returned no id".into()))
}

/// The full transcript of a conversation in order.
pub async fn list_messages(db: &Database, conversation_id: &str) -> Result<Vec<Message>, AulaError> {
    let conversation_id = conversation_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, conversation_id, role, content, tool_calls, tool_call_id, created_at
                 FROM messages WHERE conversation_id = ?1
                 ORDER BY created_at ASC, seq ASC",
            )?;
            let messages = stmt
                .query_map(params![conversation_id], row_to_message)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(messages)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::conversations::{create_conversation, get_conversation};
    use tempfile::tempdir;

    async fn setup_db_with_conversation() -> (Database, String, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        let conversation = create_conversation(&db, "user-1").await.unwrap();
        (db, conversation.id, dir)
    }

    #[tokio::test]
    async fn append_and_list_in_order() {
        let (db, conv, _dir) = setup_db_with_conversation().await;

        append_message(&db, &conv, &ChatMessage::user("qual minha média?")).await.unwrap();
        append_message(&db, &conv, &ChatMessage::assistant("7.5")).await.unwrap();
        append_message(&db, &conv, &ChatMessage::user("obrigado")).await.unwrap();

        let messages = list_messages(&db, &conv).await.unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].content.as_deref(), Some("7.5"));
        assert_eq!(messages[2].content.as_deref(), Some("obrigado"));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn tool_calls_round_trip_verbatim() {
        let (db, conv, _dir) = setup_db_with_conversation().await;
        let call = ToolCall::function("call_abc", "consultar_media", r#"{"discipline": "SE101"}"#);
        let batch = vec![
            ChatMessage::assistant_tool_calls(None, vec![call.clone()]),
            ChatMessage::tool("call_abc", r#"{"average":7.5}"#),
            ChatMessage::assistant("Sua média é 7.5"),
        ];
        let ids = append_messages(&db, &conv, &batch).await.unwrap();
        assert_eq!(ids.len(), 3);

        let messages = list_messages(&db, &conv).await.unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].content, None);
        assert_eq!(messages[0].tool_calls.as_deref(), Some(&[call][..]));
        assert_eq!(messages[1].tool_call_id.as_deref(), Some("call_abc"));
        let replayed: Vec<ChatMessage> = messages.iter().map(Message::to_chat).collect();
        assert_eq!(replayed, batch);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn append_bumps_updated_at() {
        let (db, conv, _dir) = setup_db_with_conversation().await;
        let before = get_conversation(&db, &conv).await.unwrap().unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        append_message(&db, &conv, &ChatMessage::user("oi")).await.unwrap();
        let after = get_conversation(&db, &conv).await.unwrap().unwrap();
        assert!(after.updated_at > before.updated_at);
        assert_eq!(after.created_at, before.created_at);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn append_to_missing_conversation_is_not_found() {
        let (db, _conv, _dir) = setup_db_with_conversation().await;
        let err = append_message(&db, "missing", &ChatMessage::user("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, AulaError::NotFound { entity: "conversation", .. }));
        assert!(list_messages(&db, "missing").await.unwrap().is_empty());
        db.close().await.unwrap();
    }
}
