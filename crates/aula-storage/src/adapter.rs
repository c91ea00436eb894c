// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the storage traits.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use aula_config::model::StorageConfig;
use aula_core::llm::ChatMessage;
use aula_core::types::{
    AbsenceRecord, ClassSlot, Conversation, Enrollment, EnrollmentView, Evaluation,
    EvaluationMethod, Message, NewAbsence,
};
use aula_core::{
    AcademicStore, AdapterType, AulaError, ConversationStore, HealthStatus, PluginAdapter,
    StorageAdapter,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed conversation and academic store.
///
/// The database is opened by [`StorageAdapter::initialize`]; every other
/// operation fails until then.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// The open database, for seeding and administrative queries.
    pub fn database(&self) -> Result<&Database, AulaError> {
        self.db
            .get()
            .ok_or_else(|| AulaError::storage("storage not initialized -- call initialize() first"))
    }

    async fn checkpoint(&self, db: &Database) -> Result<(), AulaError> {
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        debug!(path = %self.config.database_path, "WAL checkpoint complete");
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, AulaError> {
        self.database()?
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), AulaError> {
        match self.db.get() {
            Some(db) => self.checkpoint(db).await,
            None => Ok(()),
        }
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), AulaError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db
            .set(db)
            .map_err(|_| AulaError::storage("storage already initialized"))?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), AulaError> {
        let db = self.database()?;
        self.checkpoint(db).await
    }
}

#[async_trait]
impl ConversationStore for SqliteStorage {
    async fn create_conversation(&self, user_id: &str) -> Result<String, AulaError> {
        let conversation = queries::conversations::create_conversation(self.database()?, user_id).await?;
        Ok(conversation.id)
    }

    async fn get_conversation(&self, id: &str) -> Result<Option<Conversation>, AulaError> {
        queries::conversations::get_conversation(self.database()?, id).await
    }

    async fn list_conversations(&self, user_id: &str) -> Result<Vec<Conversation>, AulaError> {
        queries::conversations::list_conversations(self.database()?, user_id).await
    }

    async fn append_message(
        &self,
        conversation_id: &str,
        message: &ChatMessage,
    ) -> Result<String, AulaError> {
        queries::messages::append_message(self.database()?, conversation_id, message).await
    }

    async fn append_messages(
        &self,
        conversation_id: &str,
        messages: &[ChatMessage],
    ) -> Result<Vec<String>, AulaError> {
        queries::messages::append_messages(self.database()?, conversation_id, messages).await
    }

    async fn list_messages(&self, conversation_id: &str) -> Result<Vec<Message>, AulaError> {
        queries::messages::list_messages(self.database()?, conversation_id).await
    }
}

#[async_trait]
impl AcademicStore for SqliteStorage {
    async fn enrollments_for_student(
        &self,
        student_id: &str,
        period: Option<&str>,
    ) -> Result<Vec<EnrollmentView>, AulaError> {
        queries::academic::enrollments_for_student(self.database()?, student_id, period).await
    }

    async fn get_evaluation_method(
        &self,
        enrollment_id: &str,
    ) -> Result<Option<EvaluationMethod>, AulaError> {
        queries::academic::get_evaluation_method(self.database()?, enrollment_id).await
    }

    async fn list_evaluations(&self, method_id: &str) -> Result<Vec<Evaluation>, AulaError> {
        queries::academic::list_evaluations(self.database()?, method_id).await
    }

    async fn set_evaluation_score(
        &self,
        evaluation_id: &str,
        score: Option<f64>,
    ) -> Result<Enrollment, AulaError> {
        queries::academic::set_evaluation_score(self.database()?, evaluation_id, score).await
    }

    async fn record_absence(
        &self,
        enrollment_id: &str,
        absence: &NewAbsence,
    ) -> Result<Enrollment, AulaError> {
        queries::academic::record_absence(self.database()?, enrollment_id, absence).await
    }

    async fn list_absences(&self, enrollment_id: &str) -> Result<Vec<AbsenceRecord>, AulaError> {
        queries::academic::list_absences(self.database()?, enrollment_id).await
    }

    async fn recompute_enrollment(&self, enrollment_id: &str) -> Result<Enrollment, AulaError> {
        queries::academic::recompute_enrollment(self.database()?, enrollment_id).await
    }

    async fn class_schedule(
        &self,
        student_id: &str,
        period: &str,
    ) -> Result<Vec<ClassSlot>, AulaError> {
        queries::schedule::class_schedule(self.database()?, student_id, period).await
    }
}
