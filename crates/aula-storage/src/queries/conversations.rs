// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation CRUD operations.

use aula_core::AulaError;
use aula_core::types::Conversation;
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, now_iso};

/// Title given to every new conversation.
pub const DEFAULT_TITLE: &str = "New conversation";

const COLUMNS: &str = "id, user_id, title, created_at, updated_at";

fn row_to_conversation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Conversation> {
    Ok(Conversation {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

/// Create a conversation owned by `user_id` and return it.
pub async fn create_conversation(db: &Database, user_id: &str) -> Result<Conversation, AulaError> {
    let now = now_iso();
    let conversation = Conversation {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        title: DEFAULT_TITLE.to_string(),
        created_at: now.clone(),
        updated_at: now,
    };
    let row = conversation.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO conversations (id, user_id, title, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![row.id, row.user_id, row.title, row.created_at, row.updated_at],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    Ok(conversation)
}

pub async fn get_conversation(db: &Database, id: &str) -> Result<Option<Conversation>, AulaError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {COLUMNS} FROM conversations WHERE id = ?1"),
                params![id],
                row_to_conversation,
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Conversations of `user_id`, most recently updated first.
pub async fn list_conversations(
    db: &Database,
    user_id: &str,
) -> Result<Vec<Conversation>, AulaError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM conversations WHERE user_id = ?1
                 ORDER BY updated_at DESC, created_at DESC"
            ))?;
            let rows = stmt
                .query_map(params![user_id], row_to_conversation)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn create_and_get_conversation() {
        let (db, _dir) = setup_db().await;
        let created = create_conversation(&db, "user-1").await.unwrap();
        assert_eq!(created.title, DEFAULT_TITLE);
        assert_eq!(created.created_at, created.updated_at);

        let fetched = get_conversation(&db, &created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_missing_conversation_returns_none() {
        let (db, _dir) = setup_db().await;
        assert!(get_conversation(&db, "nope").await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_is_scoped_to_user() {
        let (db, _dir) = setup_db().await;
        create_conversation(&db, "alice").await.unwrap();
        create_conversation(&db, "alice").await.unwrap();
        create_conversation(&db, "bob").await.unwrap();

        assert_eq!(list_conversations(&db, "alice").await.unwrap().len(), 2);
        assert_eq!(list_conversations(&db, "bob").await.unwrap().len(), 1);
        assert!(list_conversations(&db, "carol").await.unwrap().is_empty());
        db.close().await.unwrap();
    }
}
