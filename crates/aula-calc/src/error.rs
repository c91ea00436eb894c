// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain errors raised by calculation preconditions.

use thiserror::Error;

/// A calculation precondition was violated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// Absence counts can never be negative.
    #[error("absence count cannot be negative (got {0})")]
    NegativeAbsences(i64),
}
