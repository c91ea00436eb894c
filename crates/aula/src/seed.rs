// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `aula seed` command implementation.

use aula_config::model::AulaConfig;
use aula_core::{AulaError, StorageAdapter};
use aula_storage::{DemoSeed, seed_demo};
use colored::Colorize;

use crate::runtime::open_storage;

/// Runs `aula seed`, using the configured academic minimums.
pub async fn run_seed(
    config: AulaConfig,
    student: String,
    period: Option<String>,
) -> Result<(), AulaError> {
    let seed = DemoSeed {
        student_id: student,
        period: period.unwrap_or_else(|| config.academic.default_period.clone()),
        min_average: config.academic.min_average,
        min_attendance: config.academic.min_attendance,
    };

    let storage = open_storage(&config).await?;
    let report = seed_demo(storage.database()?, &seed).await;
    storage.close().await?;
    let report = report?;

    if report.skipped {
        println!(
            "{} {} already has {} enrollments in {}",
            "skipped:".yellow(),
            seed.student_id,
            report.enrollments,
            seed.period
        );
    } else {
        println!(
            "{} {} enrollments for {} in {}",
            "seeded".green(),
            report.enrollments,
            seed.student_id,
            seed.period
        );
    }
    Ok(())
}
