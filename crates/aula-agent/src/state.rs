// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! States of a single turn.
//!
//! Open -> AppendUser -> BuildContext -> InvokeModel -> (ExecuteTools -> InvokeModel)*
//! -> PersistAnswer. Any fatal error leaves the machine; only the user message
//! stays persisted.

use aula_core::ChatMessage;

#[derive(Debug, Clone, PartialEq)]
pub enum TurnState {
    /// Resolve or create the conversation and take its lock.
    Open,
    /// Persist the incoming user message.
    AppendUser,
    /// System prompt plus the persisted transcript.
    BuildContext,
    /// Call the model; `round` counts the tool rounds already executed.
    InvokeModel { round: usize },
    /// Run every call of the assistant message, answering each by id.
    ExecuteTools { round: usize, message: ChatMessage },
    /// Persist the round messages and the final answer together.
    PersistAnswer { rounds: usize, answer: String },
}

impl std::fmt::Display for TurnState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnState::Open => write!(f, "open"),
            TurnState::AppendUser => write!(f, "append_user"),
            TurnState::BuildContext => write!(f, "build_context"),
            TurnState::InvokeModel { round } => write!(f, "invoke_model[{round}]"),
            TurnState::ExecuteTools { round, .. } => write!(f, "execute_tools[{round}]"),
            TurnState::PersistAnswer { .. } => write!(f, "persist_answer"),
        }
    }
}
