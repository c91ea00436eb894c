// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-conversation turn serialization.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per conversation id, created on demand and dropped once
/// nobody holds or waits for it.
#[derive(Debug, Clone, Default)]
pub struct ConversationLocks {
    inner: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl ConversationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other turn holds `conversation_id`.
    pub async fn acquire(&self, conversation_id: &str) -> ConversationGuard {
        let lock = self
            .inner
            .entry(conversation_id.to_string())
            .or_default()
            .clone();
        ConversationGuard {
            guard: Some(lock.lock_owned().await),
            locks: Arc::clone(&self.inner),
            conversation_id: conversation_id.to_string(),
        }
    }

    /// Number of conversations with a live lock.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Held for the duration of one turn.
#[derive(Debug)]
pub struct ConversationGuard {
    guard: Option<OwnedMutexGuard<()>>,
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
    conversation_id: String,
}

impl Drop for ConversationGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.locks
            .remove_if(&self.conversation_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}
