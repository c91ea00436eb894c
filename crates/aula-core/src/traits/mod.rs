// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod academic;
pub mod adapter;
pub mod conversation;
pub mod llm;
pub mod storage;

pub use academic::AcademicStore;
pub use adapter::PluginAdapter;
pub use conversation::ConversationStore;
pub use llm::LlmClient;
pub use storage::StorageAdapter;
