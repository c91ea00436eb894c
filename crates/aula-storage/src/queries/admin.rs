// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Administrative inserts used by seeding and tests.
//!
//! These bypass recomputation; call
//! [`recompute_enrollment`](crate::queries::academic::recompute_enrollment)
//! once the records of an enrollment are in place.

use aula_calc::{AverageMethod, EnrollmentStatus};
use aula_core::AulaError;
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, map_tr_err, now_iso};

#[derive(Debug, Clone)]
pub struct NewCourse {
    pub code: String,
    pub name: String,
    pub total_hours: i64,
}

#[derive(Debug, Clone)]
pub struct NewEnrollment {
    pub student_id: String,
    pub course_id: String,
    pub period: String,
    pub min_average: f64,
    pub min_attendance: f64,
}

#[derive(Debug, Clone)]
pub struct NewEvaluation {
    pub name: String,
    pub weight: f64,
    pub max_score: f64,
    pub score: Option<f64>,
    pub due_date: Option<String>,
    pub substitute: bool,
}

impl Default for NewEvaluation {
    fn default() -> Self {
        Self {
            name: String::new(),
            weight: 1.0,
            max_score: aula_calc::MAX_SCORE,
            score: None,
            due_date: None,
            substitute: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewClassSlot {
    pub course_id: String,
    pub period: String,
    /// 0 = Sunday.
    pub weekday: u32,
    pub start_time: String,
    pub end_time: Option<String>,
    pub room: Option<String>,
}

/// Insert a course, or return the id of the existing course with the same code.
pub async fn insert_course(db: &Database, course: &NewCourse) -> Result<String, AulaError> {
    let course = course.clone();
    db.connection()
        .call(move |conn| {
            let existing: Option<String> = conn
                .query_row(
                    "SELECT id FROM courses WHERE code = ?1",
                    params![course.code],
                    |row| row.get(0),
                )
                .optional()?;
            if let Some(id) = existing {
                return Ok(id);
            }
            let id = format!("course-{}", course.code.to_lowercase());
            conn.execute(
                "INSERT INTO courses (id, code, name, total_hours) VALUES (?1, ?2, ?3, ?4)",
                params![id, course.code, course.name, course.total_hours],
            )?;
            Ok(id)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn insert_enrollment(
    db: &Database,
    enrollment: &NewEnrollment,
) -> Result<String, AulaError> {
    let enrollment = enrollment.clone();
    let id = uuid::Uuid::new_v4().to_string();
    let row_id = id.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO enrollments
                     (id, student_id, course_id, period, min_average, min_attendance, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    row_id,
                    enrollment.student_id,
                    enrollment.course_id,
                    enrollment.period,
                    enrollment.min_average,
                    enrollment.min_attendance,
                    now_iso(),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;
    Ok(id)
}

pub async fn insert_method(
    db: &Database,
    enrollment_id: &str,
    kind: AverageMethod,
    description: Option<&str>,
) -> Result<String, AulaError> {
    let id = uuid::Uuid::new_v4().to_string();
    let row = (
        id.clone(),
        enrollment_id.to_string(),
        kind.to_string(),
        description.map(str::to_string),
    );
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO evaluation_methods (id, enrollment_id, kind, description)
                 VALUES (?1, ?2, ?3, ?4)",
                params![row.0, row.1, row.2, row.3],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;
    Ok(id)
}

/// Append an evaluation after the method's existing ones.
pub async fn insert_evaluation(
    db: &Database,
    method_id: &str,
    evaluation: &NewEvaluation,
) -> Result<String, AulaError> {
    let id = uuid::Uuid::new_v4().to_string();
    let row_id = id.clone();
    let method_id = method_id.to_string();
    let evaluation = evaluation.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO evaluations
                     (id, method_id, name, weight, max_score, score, due_date, substitute, position)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8,
                         (SELECT COALESCE(MAX(position), -1) + 1 FROM evaluations WHERE method_id = ?2))",
                params![
                    row_id,
                    method_id,
                    evaluation.name,
                    evaluation.weight,
                    evaluation.max_score,
                    evaluation.score,
                    evaluation.due_date,
                    evaluation.substitute,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;
    Ok(id)
}

pub async fn insert_class_slot(db: &Database, slot: &NewClassSlot) -> Result<String, AulaError> {
    let id = uuid::Uuid::new_v4().to_string();
    let row_id = id.clone();
    let slot = slot.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO class_slots (id, course_id, period, weekday, start_time, end_time, room)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    row_id,
                    slot.course_id,
                    slot.period,
                    slot.weekday,
                    slot.start_time,
                    slot.end_time,
                    slot.room,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;
    Ok(id)
}

/// Set an enrollment's status directly (e.g. a withdrawal).
pub async fn set_enrollment_status(
    db: &Database,
    enrollment_id: &str,
    status: EnrollmentStatus,
) -> Result<(), AulaError> {
    let id = enrollment_id.to_string();
    let updated = db
        .connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE enrollments SET status = ?1, updated_at = ?2 WHERE id = ?3",
                params![status.as_ref(), now_iso(), id],
            )
        })
        .await
        .map_err(map_tr_err)?;
    if updated == 0 {
        return Err(AulaError::NotFound {
            entity: "enrollment",
            key: enrollment_id.to_string(),
        });
    }
    Ok(())
}
