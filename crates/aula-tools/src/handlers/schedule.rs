// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Weekly schedule and next-class lookup.

use aula_calc::{next_class, parse_start_time, weekday_from_name, weekday_name};
use aula_core::types::ClassSlot;
use chrono::{Datelike, Duration, Timelike};
use serde::Serialize;

use crate::args::ScheduleArgs;
use crate::catalog::ToolCatalog;
use crate::error::ToolError;

#[derive(Debug, Serialize)]
pub struct ClassEntry {
    pub discipline: String,
    pub code: String,
    pub weekday: &'static str,
    pub start_time: String,
    pub end_time: Option<String>,
    pub room: Option<String>,
}

impl From<&ClassSlot> for ClassEntry {
    fn from(slot: &ClassSlot) -> Self {
        Self {
            discipline: slot.course_name.clone(),
            code: slot.course_code.clone(),
            weekday: weekday_name(slot.weekday),
            start_time: slot.start_time.clone(),
            end_time: slot.end_time.clone(),
            room: slot.room.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ScheduleReport {
    pub period: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<&'static str>,
    pub classes: Vec<ClassEntry>,
}

#[derive(Debug, Serialize)]
pub struct NextClassReport {
    pub found: bool,
    pub now: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<ClassEntry>,
    /// `YYYY-MM-DD` of the next occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_until: Option<u32>,
}

impl ToolCatalog {
    async fn slots(&self) -> Result<Vec<ClassSlot>, ToolError> {
        Ok(self
            .store
            .class_schedule(self.student_id(), self.period())
            .await?)
    }

    pub(crate) async fn schedule(&self, args: ScheduleArgs) -> Result<ScheduleReport, ToolError> {
        let day = match args.day.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(
                weekday_from_name(raw)
                    .ok_or_else(|| ToolError::invalid(format!("unknown weekday '{raw}'")))?,
            ),
            _ => None,
        };

        let classes = self
            .slots()
            .await?
            .iter()
            .filter(|slot| day.is_none_or(|d| slot.weekday == d))
            .map(ClassEntry::from)
            .collect();
        Ok(ScheduleReport {
            period: self.period().to_string(),
            day: day.map(weekday_name),
            classes,
        })
    }

    pub(crate) async fn next_class(&self) -> Result<NextClassReport, ToolError> {
        let now = self.now();
        let slots = self.slots().await?;
        let Some(slot) = next_class(&slots, now) else {
            return Ok(NextClassReport {
                found: false,
                now: now.format("%Y-%m-%d %H:%M").to_string(),
                class: None,
                date: None,
                days_until: None,
            });
        };

        let today = now.weekday().num_days_from_sunday();
        let now_minutes = now.hour() * 60 + now.minute();
        let days_until = match (slot.weekday + 7 - today) % 7 {
            // Same weekday but already started: next week.
            0 if parse_start_time(&slot.start_time).is_some_and(|m| m <= now_minutes) => 7,
            days => days,
        };
        let date = now.date() + Duration::days(i64::from(days_until));

        Ok(NextClassReport {
            found: true,
            now: now.format("%Y-%m-%d %H:%M").to_string(),
            class: Some(ClassEntry::from(slot)),
            date: Some(date.format("%Y-%m-%d").to_string()),
            days_until: Some(days_until),
        })
    }
}
