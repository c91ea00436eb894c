// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Aula crates.

use aula_calc::{AverageMethod, EnrollmentStatus, GradeItem, Scheduled};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::llm::{ChatMessage, Role, ToolCall};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Llm,
    Storage,
}

// --- Conversation records ---

/// A chat conversation owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub user_id: String,
    pub title: String,
    /// ISO 8601 timestamp.
    pub created_at: String,
    /// Bumped every time a message is appended.
    pub updated_at: String,
}

/// A persisted message of a conversation transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub role: Role,
    /// `None` for assistant messages that only carry tool calls.
    pub content: Option<String>,
    pub tool_calls: Option<Vec<ToolCall>>,
    pub tool_call_id: Option<String>,
    pub created_at: String,
}

impl Message {
    /// The message as it is replayed to the LLM client.
    pub fn to_chat(&self) -> ChatMessage {
        ChatMessage {
            role: self.role,
            content: self.content.clone(),
            tool_calls: self.tool_calls.clone(),
            tool_call_id: self.tool_call_id.clone(),
        }
    }
}

// --- Academic records ---

/// A course offering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub code: String,
    pub name: String,
    /// Total workload in hours; drives the attendance percentage.
    pub total_hours: i64,
}

/// A student's registration in one course for one academic period.
///
/// `absences`, `attendance`, `average` and `status` are derived values kept in
/// sync by the storage layer's recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: String,
    pub student_id: String,
    pub course_id: String,
    pub period: String,
    pub min_average: f64,
    pub min_attendance: f64,
    pub absences: i64,
    pub attendance: u8,
    pub average: f64,
    pub status: EnrollmentStatus,
    pub updated_at: String,
}

/// How one enrollment's evaluations are reduced to an average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMethod {
    pub id: String,
    pub enrollment_id: String,
    pub kind: AverageMethod,
    pub description: Option<String>,
}

/// A single gradable item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: String,
    pub method_id: String,
    pub name: String,
    pub weight: f64,
    pub max_score: f64,
    /// `None` until graded.
    pub score: Option<f64>,
    /// Scheduled date, `YYYY-MM-DD`.
    pub due_date: Option<String>,
    pub substitute: bool,
}

impl Evaluation {
    pub fn to_grade_item(&self) -> GradeItem {
        GradeItem {
            id: Some(self.id.clone()),
            name: Some(self.name.clone()),
            weight: self.weight,
            score: self.score,
            substitute: self.substitute,
        }
    }
}

/// One recorded absence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbsenceRecord {
    pub id: String,
    pub enrollment_id: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub justified: bool,
    pub justification: Option<String>,
    pub created_at: String,
}

/// Input for recording an absence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewAbsence {
    pub date: String,
    pub justified: bool,
    pub justification: Option<String>,
}

/// An enrollment joined with its course and evaluation method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentView {
    pub enrollment: Enrollment,
    pub course: Course,
    pub method: Option<EvaluationMethod>,
}

/// A weekly class slot of a course the student is enrolled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSlot {
    pub id: String,
    pub course_id: String,
    pub course_code: String,
    pub course_name: String,
    pub period: String,
    /// 0 = Sunday.
    pub weekday: u32,
    /// `HH:MM`.
    pub start_time: String,
    pub end_time: Option<String>,
    pub room: Option<String>,
}

impl Scheduled for ClassSlot {
    fn weekday(&self) -> u32 {
        self.weekday
    }

    fn start_time(&self) -> &str {
        &self.start_time
    }
}
