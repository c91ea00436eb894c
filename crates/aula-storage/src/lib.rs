// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Aula academic assistant.
//!
//! WAL-mode SQLite with embedded migrations, a single-writer connection via
//! `tokio-rusqlite`, typed queries for conversations and academic records,
//! and transactional enrollment recomputation on every grade or absence write.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;
pub mod seed;

pub use adapter::SqliteStorage;
pub use database::Database;
pub use seed::{DemoSeed, SeedReport, seed_demo};
