// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool catalog for the Aula assistant.
//!
//! A [`ToolCatalog`] is bound to one student and one academic period. It
//! advertises a fixed set of functions to the model ([`tool_specs`]) and runs
//! them against an [`aula_core::AcademicStore`], returning JSON results or
//! `{"error": ...}` values that the orchestration loop feeds back verbatim.

pub mod args;
pub mod catalog;
pub mod error;
pub mod handlers;
pub mod tool;

pub use catalog::{Clock, ToolCatalog, ToolOutput};
pub use error::ToolError;
pub use tool::{ToolName, tool_specs};
