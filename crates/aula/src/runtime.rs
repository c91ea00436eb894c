// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wiring shared by the subcommands: tracing, storage and the orchestrator.

use std::sync::Arc;

use aula_agent::{Orchestrator, TurnRequest, load_system_prompt};
use aula_config::model::AulaConfig;
use aula_core::{AulaError, StorageAdapter};
use aula_openai::OpenAiProvider;
use aula_storage::SqliteStorage;
use tracing::info;

/// Owner used when `--user` is not given.
pub const LOCAL_USER: &str = "local";

/// Initialize the tracing subscriber with the given log level.
///
/// Logs go to stderr so answers on stdout stay machine-readable.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("aula={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

/// Open the configured SQLite database, creating parent directories.
pub async fn open_storage(config: &AulaConfig) -> Result<Arc<SqliteStorage>, AulaError> {
    if let Some(parent) = std::path::Path::new(&config.storage.database_path).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(AulaError::storage)?;
    }
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    Ok(Arc::new(storage))
}

/// An initialized storage plus the orchestrator running on top of it.
pub struct Runtime {
    pub storage: Arc<SqliteStorage>,
    pub orchestrator: Orchestrator,
}

impl Runtime {
    pub async fn start(config: &AulaConfig) -> Result<Self, AulaError> {
        let storage = open_storage(config).await?;
        let llm = OpenAiProvider::new(&config.llm).inspect_err(|_| {
            eprintln!(
                "error: API key required. Set llm.api_key, AULA_LLM_API_KEY or {}",
                aula_openai::API_KEY_ENV
            );
        })?;
        info!(model = llm.model(), "LLM client ready");

        let orchestrator = Orchestrator::new(
            &config.agent,
            storage.clone(),
            storage.clone(),
            Arc::new(llm),
            load_system_prompt(&config.agent).await,
        );
        Ok(Self {
            storage,
            orchestrator,
        })
    }

    pub async fn shutdown(self) -> Result<(), AulaError> {
        self.storage.close().await
    }
}

/// Runs `aula ask`: one turn, answer on stdout.
pub async fn run_ask(config: AulaConfig, request: TurnRequest) -> Result<(), AulaError> {
    let runtime = Runtime::start(&config).await?;
    let result = runtime.orchestrator.handle_turn(request).await;
    runtime.shutdown().await?;

    let reply = result?;
    println!("{}", reply.answer);
    eprintln!("conversation: {}", reply.conversation_id);
    Ok(())
}
