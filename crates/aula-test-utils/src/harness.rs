// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a temp SQLite database seeded with the demo
//! student, a [`ScriptedLlm`] and an [`Orchestrator`] whose tools see a fixed
//! clock (Monday 2025-11-17 09:00).

use std::sync::Arc;
use std::time::Duration;

use aula_agent::{Orchestrator, TurnReply, TurnRequest};
use aula_config::{AgentConfig, StorageConfig};
use aula_core::types::Message;
use aula_core::{AulaError, ConversationStore, StorageAdapter};
use aula_storage::{DemoSeed, SqliteStorage, seed_demo};
use chrono::NaiveDate;

use crate::scripted_llm::ScriptedLlm;

pub const USER_ID: &str = "user-1";
pub const STUDENT_ID: &str = "stu-1";
pub const PERIOD: &str = "2025.2";

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    llm: ScriptedLlm,
    max_tool_rounds: usize,
    call_timeout: Option<Duration>,
    system_prompt: String,
    seeded: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            llm: ScriptedLlm::new(),
            max_tool_rounds: AgentConfig::default().max_tool_rounds,
            call_timeout: None,
            system_prompt: "You are a test assistant.".to_string(),
            seeded: true,
        }
    }

    pub fn with_llm(mut self, llm: ScriptedLlm) -> Self {
        self.llm = llm;
        self
    }

    pub fn with_max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    pub fn with_system_prompt(mut self, prompt: &str) -> Self {
        self.system_prompt = prompt.to_string();
        self
    }

    /// Skip the demo records.
    pub fn empty(mut self) -> Self {
        self.seeded = false;
        self
    }

    pub async fn build(self) -> Result<TestHarness, AulaError> {
        let temp_dir = tempfile::TempDir::new().map_err(AulaError::storage)?;
        let storage = SqliteStorage::new(StorageConfig {
            database_path: temp_dir.path().join("test.db").to_string_lossy().into_owned(),
            wal_mode: true,
        });
        storage.initialize().await?;

        if self.seeded {
            seed_demo(
                storage.database()?,
                &DemoSeed {
                    student_id: STUDENT_ID.to_string(),
                    period: PERIOD.to_string(),
                    min_average: 5.0,
                    min_attendance: 75.0,
                },
            )
            .await?;
        }

        let storage = Arc::new(storage);
        let llm = Arc::new(self.llm);
        let config = AgentConfig {
            max_tool_rounds: self.max_tool_rounds,
            ..AgentConfig::default()
        };
        let now = NaiveDate::from_ymd_opt(2025, 11, 17)
            .and_then(|d| d.and_hms_opt(9, 0, 0))
            .ok_or_else(|| AulaError::Internal("invalid harness clock".into()))?;

        let mut orchestrator = Orchestrator::new(
            &config,
            storage.clone(),
            storage.clone(),
            llm.clone(),
            self.system_prompt,
        )
        .with_clock(Arc::new(move || now));
        if let Some(timeout) = self.call_timeout {
            orchestrator = orchestrator.with_call_timeout(timeout);
        }

        Ok(TestHarness {
            llm,
            storage,
            orchestrator,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with a scripted model and temp storage.
pub struct TestHarness {
    pub llm: Arc<ScriptedLlm>,
    /// SQLite storage (temp DB, cleaned up on drop).
    pub storage: Arc<SqliteStorage>,
    pub orchestrator: Orchestrator,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// A request from the demo user about the demo student.
    pub fn request(&self, text: &str) -> TurnRequest {
        TurnRequest::new(USER_ID, STUDENT_ID, PERIOD, text)
    }

    /// Runs one turn in a new conversation.
    pub async fn ask(&self, text: &str) -> Result<TurnReply, AulaError> {
        self.orchestrator.handle_turn(self.request(text)).await
    }

    /// Runs one turn in an existing conversation.
    pub async fn ask_in(&self, conversation_id: &str, text: &str) -> Result<TurnReply, AulaError> {
        self.orchestrator
            .handle_turn(self.request(text).in_conversation(conversation_id))
            .await
    }

    /// Persisted transcript of a conversation.
    pub async fn messages(&self, conversation_id: &str) -> Result<Vec<Message>, AulaError> {
        self.storage.list_messages(conversation_id).await
    }
}
