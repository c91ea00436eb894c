// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool-orchestration loop for the Aula academic assistant.
//!
//! The [`Orchestrator`] drives one user message to a final answer:
//! - Resolves or creates the conversation and serializes turns on it
//! - Persists the user message before anything can fail
//! - Alternates model calls and tool rounds up to `agent.max_tool_rounds`
//! - Applies `agent.call_timeout_secs` to every model, storage and tool call
//! - Persists the round messages and the answer in one write

pub mod context;
pub mod locks;
pub mod state;
pub mod transcript;

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use aula_config::AgentConfig;
use aula_core::types::{Conversation, Message};
use aula_core::{AcademicStore, AulaError, ChatMessage, ConversationStore, LlmClient, ToolCall};
use aula_tools::{Clock, ToolCatalog, ToolOutput};
use tracing::{debug, info, warn};

pub use crate::context::{default_system_prompt, load_system_prompt};
use crate::locks::ConversationLocks;
pub use crate::state::TurnState;
pub use crate::transcript::Transcript;

/// One inbound user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnRequest {
    /// Authenticated owner of the conversation.
    pub user_id: String,
    /// Student whose records the tools may touch.
    pub student_id: String,
    pub period: String,
    /// `None` starts a new conversation.
    pub conversation_id: Option<String>,
    pub text: String,
}

impl TurnRequest {
    pub fn new(
        user_id: impl Into<String>,
        student_id: impl Into<String>,
        period: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            student_id: student_id.into(),
            period: period.into(),
            conversation_id: None,
            text: text.into(),
        }
    }

    pub fn in_conversation(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self
    }
}

/// Result of a completed turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReply {
    pub conversation_id: String,
    pub answer: String,
    /// Tool rounds executed before the answer.
    pub rounds: usize,
}

pub struct Orchestrator {
    conversations: Arc<dyn ConversationStore>,
    academic: Arc<dyn AcademicStore>,
    llm: Arc<dyn LlmClient>,
    system_prompt: String,
    max_tool_rounds: usize,
    call_timeout: Duration,
    locks: ConversationLocks,
    clock: Option<Clock>,
}

impl Orchestrator {
    pub fn new(
        config: &AgentConfig,
        conversations: Arc<dyn ConversationStore>,
        academic: Arc<dyn AcademicStore>,
        llm: Arc<dyn LlmClient>,
        system_prompt: String,
    ) -> Self {
        info!(
            agent_name = config.name.as_str(),
            llm = llm.name(),
            max_tool_rounds = config.max_tool_rounds,
            call_timeout_secs = config.call_timeout_secs,
            "orchestrator initialized"
        );
        Self {
            conversations,
            academic,
            llm,
            system_prompt,
            max_tool_rounds: config.max_tool_rounds,
            call_timeout: Duration::from_secs(config.call_timeout_secs),
            locks: ConversationLocks::new(),
            clock: None,
        }
    }

    /// Replace the per-call timeout.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Clock handed to every tool catalog, e.g. a fixed instant in tests.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn max_tool_rounds(&self) -> usize {
        self.max_tool_rounds
    }

    /// Processes one user message and returns the assistant's answer.
    ///
    /// Tool failures are fed back to the model. Storage, model and protocol
    /// failures end the turn; the user message stays persisted.
    pub async fn handle_turn(&self, request: TurnRequest) -> Result<TurnReply, AulaError> {
        let started = Instant::now();
        info!(
            user_id = %request.user_id,
            student_id = %request.student_id,
            period = %request.period,
            "turn started"
        );
        let result = self.run_turn(&request).await;
        match &result {
            Ok(reply) => info!(
                conversation_id = %reply.conversation_id,
                rounds = reply.rounds,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "turn finished"
            ),
            Err(e) => warn!(error = %e, status = ?e.status(), "turn failed"),
        }
        result
    }

    async fn run_turn(&self, request: &TurnRequest) -> Result<TurnReply, AulaError> {
        let catalog = self.catalog_for(request);
        let tools = catalog.specs();

        let mut conversation_id = String::new();
        let mut _guard = None;
        let mut transcript = Transcript::default();
        let mut state = TurnState::Open;

        loop {
            debug!(conversation_id = %conversation_id, state = %state, "turn state");
            state = match state {
                TurnState::Open => {
                    let id = self.open(request).await?;
                    _guard = Some(self.locks.acquire(&id).await);
                    conversation_id = id;
                    TurnState::AppendUser
                }
                TurnState::AppendUser => {
                    let user = ChatMessage::user(request.text.as_str());
                    self.bounded(
                        "append user message",
                        self.conversations.append_message(&conversation_id, &user),
                    )
                    .await?;
                    TurnState::BuildContext
                }
                TurnState::BuildContext => {
                    let history = self
                        .bounded(
                            "list messages",
                            self.conversations.list_messages(&conversation_id),
                        )
                        .await?;
                    transcript = Transcript::new(&self.system_prompt, &history);
                    TurnState::InvokeModel { round: 0 }
                }
                TurnState::InvokeModel { round } => {
                    let response = self
                        .bounded("llm invoke", self.llm.invoke(transcript.request(&tools)))
                        .await?;
                    if !response.has_tool_calls() {
                        let answer = response.message.content.unwrap_or_default();
                        if answer.is_empty() {
                            warn!(conversation_id = %conversation_id, "model returned an empty answer");
                        }
                        TurnState::PersistAnswer {
                            rounds: round,
                            answer,
                        }
                    } else if round >= self.max_tool_rounds {
                        warn!(
                            conversation_id = %conversation_id,
                            rounds = self.max_tool_rounds,
                            "model still requesting tools at the round bound"
                        );
                        return Err(AulaError::ToolRoundsExceeded {
                            rounds: self.max_tool_rounds,
                        });
                    } else {
                        TurnState::ExecuteTools {
                            round,
                            message: response.message,
                        }
                    }
                }
                TurnState::ExecuteTools { round, message } => {
                    let calls = message.calls().to_vec();
                    info!(
                        conversation_id = %conversation_id,
                        tool_count = calls.len(),
                        round,
                        "executing tool calls"
                    );
                    transcript = transcript.with(message);
                    for call in &calls {
                        let output = self.run_tool(&catalog, call).await;
                        transcript = transcript.with(ChatMessage::tool(&call.id, output.content));
                    }
                    TurnState::InvokeModel { round: round + 1 }
                }
                TurnState::PersistAnswer { rounds, answer } => {
                    transcript = transcript.with(ChatMessage::assistant(answer.as_str()));
                    self.bounded(
                        "persist answer",
                        self.conversations
                            .append_messages(&conversation_id, transcript.unpersisted()),
                    )
                    .await?;
                    return Ok(TurnReply {
                        conversation_id,
                        answer,
                        rounds,
                    });
                }
            };
        }
    }

    /// Id of the requested conversation (owned by the user) or of a new one.
    async fn open(&self, request: &TurnRequest) -> Result<String, AulaError> {
        match &request.conversation_id {
            Some(id) => {
                let conversation = self.owned_conversation(&request.user_id, id).await?;
                Ok(conversation.id)
            }
            None => {
                let id = self
                    .bounded(
                        "create conversation",
                        self.conversations.create_conversation(&request.user_id),
                    )
                    .await?;
                debug!(conversation_id = %id, "conversation created");
                Ok(id)
            }
        }
    }

    async fn owned_conversation(
        &self,
        user_id: &str,
        conversation_id: &str,
    ) -> Result<Conversation, AulaError> {
        self.bounded(
            "load conversation",
            self.conversations.get_conversation(conversation_id),
        )
        .await?
        .filter(|c| c.user_id == user_id)
        .ok_or_else(|| AulaError::NotFound {
            entity: "conversation",
            key: conversation_id.to_string(),
        })
    }

    /// Persisted transcript of one of the user's conversations.
    pub async fn history(
        &self,
        user_id: &str,
        conversation_id: &str,
    ) -> Result<Vec<Message>, AulaError> {
        let conversation = self.owned_conversation(user_id, conversation_id).await?;
        self.bounded(
            "list messages",
            self.conversations.list_messages(&conversation.id),
        )
        .await
    }

    /// The user's conversations, most recent first.
    pub async fn conversations(&self, user_id: &str) -> Result<Vec<Conversation>, AulaError> {
        self.bounded(
            "list conversations",
            self.conversations.list_conversations(user_id),
        )
        .await
    }

    fn catalog_for(&self, request: &TurnRequest) -> ToolCatalog {
        let catalog = ToolCatalog::new(
            Arc::clone(&self.academic),
            request.student_id.as_str(),
            request.period.as_str(),
        );
        match &self.clock {
            Some(clock) => catalog.with_clock(Arc::clone(clock)),
            None => catalog,
        }
    }

    async fn run_tool(&self, catalog: &ToolCatalog, call: &ToolCall) -> ToolOutput {
        let name = call.function.name.as_str();
        match tokio::time::timeout(
            self.call_timeout,
            catalog.execute(name, &call.function.arguments),
        )
        .await
        {
            Ok(output) => output,
            Err(_) => {
                warn!(tool = name, timeout = ?self.call_timeout, "tool call timed out");
                ToolOutput::error(format!(
                    "{name} timed out after {}s",
                    self.call_timeout.as_secs_f64()
                ))
            }
        }
    }

    async fn bounded<T>(
        &self,
        operation: &str,
        call: impl Future<Output = Result<T, AulaError>>,
    ) -> Result<T, AulaError> {
        tokio::time::timeout(self.call_timeout, call)
            .await
            .map_err(|_| AulaError::Timeout {
                operation: operation.to_string(),
                duration: self.call_timeout,
            })?
    }
}
