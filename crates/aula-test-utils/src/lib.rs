// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Aula integration tests.
//!
//! - [`ScriptedLlm`] - LLM client replaying scripted replies and recording requests
//! - [`TestHarness`] - temp SQLite database with the demo student and an orchestrator

pub mod harness;
pub mod scripted_llm;

pub use harness::{PERIOD, STUDENT_ID, TestHarness, USER_ID};
pub use scripted_llm::ScriptedLlm;
