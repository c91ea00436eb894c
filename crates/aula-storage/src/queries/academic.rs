// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Enrollment, evaluation and absence queries.
//!
//! Every mutation runs in one transaction together with [`recompute_in`], so
//! an enrollment's derived numbers never lag behind its records.

use aula_calc::{
    AverageMethod, EnrollmentStatus, GradeItem, all_graded, attendance_percentage, average_for,
    determine_status,
};
use aula_core::AulaError;
use aula_core::types::{
    AbsenceRecord, Course, Enrollment, EnrollmentView, Evaluation, EvaluationMethod, NewAbsence,
};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use crate::database::{Database, map_tr_err, now_iso};
use crate::queries::parse_column;

const ENROLLMENT_COLUMNS: &str = "e.id, e.student_id, e.course_id, e.period, e.min_average, \
     e.min_attendance, e.absences, e.attendance, e.average, e.status, e.updated_at";

const EVALUATION_COLUMNS: &str =
    "v.id, v.method_id, v.name, v.weight, v.max_score, v.score, v.due_date, v.substitute";

fn row_to_enrollment(row: &rusqlite::Row<'_>) -> rusqlite::Result<Enrollment> {
    Ok(Enrollment {
        id: row.get(0)?,
        student_id: row.get(1)?,
        course_id: row.get(2)?,
        period: row.get(3)?,
        min_average: row.get(4)?,
        min_attendance: row.get(5)?,
        absences: row.get(6)?,
        attendance: row.get(7)?,
        average: row.get(8)?,
        status: parse_column(row, 9)?,
        updated_at: row.get(10)?,
    })
}

fn row_to_evaluation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Evaluation> {
    Ok(Evaluation {
        id: row.get(0)?,
        method_id: row.get(1)?,
        name: row.get(2)?,
        weight: row.get(3)?,
        max_score: row.get(4)?,
        score: row.get(5)?,
        due_date: row.get(6)?,
        substitute: row.get(7)?,
    })
}

fn not_found(entity: &'static str, key: &str) -> AulaError {
    AulaError::NotFound {
        entity,
        key: key.to_string(),
    }
}

fn enrollment_in(conn: &Connection, enrollment_id: &str) -> rusqlite::Result<Option<Enrollment>> {
    conn.query_row(
        &format!("SELECT {ENROLLMENT_COLUMNS} FROM enrollments e WHERE e.id = ?1"),
        params![enrollment_id],
        row_to_enrollment,
    )
    .optional()
}

/// Recompute an enrollment's average, attendance and status from its records.
///
/// Runs on whatever connection or transaction it is given; callers that
/// mutate records pass their open transaction. A withdrawn enrollment keeps
/// its status. Returns `None` when the enrollment does not exist.
pub(crate) fn recompute_in(
    conn: &Connection,
    enrollment_id: &str,
) -> rusqlite::Result<Option<Enrollment>> {
    let Some((total_hours, min_average, min_attendance, current)) = conn
        .query_row(
            "SELECT c.total_hours, e.min_average, e.min_attendance, e.status
             FROM enrollments e JOIN courses c ON c.id = e.course_id
             WHERE e.id = ?1",
            params![enrollment_id],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, f64>(1)?,
                    row.get::<_, f64>(2)?,
                    parse_column::<EnrollmentStatus>(row, 3)?,
                ))
            },
        )
        .optional()?
    else {
        return Ok(None);
    };

    let absences: i64 = conn.query_row(
        "SELECT COUNT(*) FROM absences WHERE enrollment_id = ?1",
        params![enrollment_id],
        |row| row.get(0),
    )?;

    let method: Option<AverageMethod> = conn
        .query_row(
            "SELECT kind FROM evaluation_methods WHERE enrollment_id = ?1",
            params![enrollment_id],
            |row| parse_column(row, 0),
        )
        .optional()?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {EVALUATION_COLUMNS} FROM evaluations v
         JOIN evaluation_methods m ON m.id = v.method_id
         WHERE m.enrollment_id = ?1"
    ))?;
    let items: Vec<GradeItem> = stmt
        .query_map(params![enrollment_id], row_to_evaluation)?
        .map(|evaluation| evaluation.map(|e| e.to_grade_item()))
        .collect::<Result<_, _>>()?;

    let average = method.map_or(0.0, |kind| average_for(kind, &items));
    let attendance = attendance_percentage(total_hours, absences)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
    let status = if current == EnrollmentStatus::Withdrawn {
        current
    } else {
        determine_status(
            average,
            f64::from(attendance),
            min_average,
            min_attendance,
            all_graded(&items),
        )
    };

    conn.execute(
        "UPDATE enrollments
         SET absences = ?1, attendance = ?2, average = ?3, status = ?4, updated_at = ?5
         WHERE id = ?6",
        params![
            absences,
            attendance,
            average,
            status.as_ref(),
            now_iso(),
            enrollment_id
        ],
    )?;
    debug!(
        enrollment_id,
        average,
        attendance,
        absences,
        status = %status,
        "enrollment recomputed"
    );

    enrollment_in(conn, enrollment_id)
}

/// Enrollments of a student joined with course and method.
pub async fn enrollments_for_student(
    db: &Database,
    student_id: &str,
    period: Option<&str>,
) -> Result<Vec<EnrollmentView>, AulaError> {
    let student_id = student_id.to_string();
    let period = period.map(str::to_string);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ENROLLMENT_COLUMNS}, c.id, c.code, c.name, c.total_hours,
                        m.id, m.kind, m.description
                 FROM enrollments e
                 JOIN courses c ON c.id = e.course_id
                 LEFT JOIN evaluation_methods m ON m.enrollment_id = e.id
                 WHERE e.student_id = ?1 AND (?2 IS NULL OR e.period = ?2)
                 ORDER BY e.period DESC, c.name ASC"
            ))?;
            let views = stmt
                .query_map(params![student_id, period], |row| {
                    let enrollment = row_to_enrollment(row)?;
                    let course = Course {
                        id: row.get(11)?,
                        code: row.get(12)?,
                        name: row.get(13)?,
                        total_hours: row.get(14)?,
                    };
                    let method_id: Option<String> = row.get(15)?;
                    let method = match method_id {
                        Some(id) => Some(EvaluationMethod {
                            id,
                            enrollment_id: enrollment.id.clone(),
                            kind: parse_column(row, 16)?,
                            description: row.get(17)?,
                        }),
                        None => None,
                    };
                    Ok(EnrollmentView {
                        enrollment,
                        course,
                        method,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(views)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_enrollment(
    db: &Database,
    enrollment_id: &str,
) -> Result<Option<Enrollment>, AulaError> {
    let enrollment_id = enrollment_id.to_string();
    db.connection()
        .call(move |conn| enrollment_in(conn, &enrollment_id))
        .await
        .map_err(map_tr_err)
}

pub async fn get_evaluation_method(
    db: &Database,
    enrollment_id: &str,
) -> Result<Option<EvaluationMethod>, AulaError> {
    let enrollment_id = enrollment_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT id, enrollment_id, kind, description
                 FROM evaluation_methods WHERE enrollment_id = ?1",
                params![enrollment_id],
                |row| {
                    Ok(EvaluationMethod {
                        id: row.get(0)?,
                        enrollment_id: row.get(1)?,
                        kind: parse_column(row, 2)?,
                        description: row.get(3)?,
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Evaluations of a method in their declared order.
pub async fn list_evaluations(db: &Database, method_id: &str) -> Result<Vec<Evaluation>, AulaError> {
    let method_id = method_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {EVALUATION_COLUMNS} FROM evaluations v
                 WHERE v.method_id = ?1
                 ORDER BY v.position ASC, v.due_date ASC, v.name ASC"
            ))?;
            let rows = stmt
                .query_map(params![method_id], row_to_evaluation)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
        .map_err(map_tr_err)
}

/// Write (or clear) a score and recompute the owning enrollment.
pub async fn set_evaluation_score(
    db: &Database,
    evaluation_id: &str,
    score: Option<f64>,
) -> Result<Enrollment, AulaError> {
    let id = evaluation_id.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let enrollment_id: Option<String> = tx
                .query_row(
                    "SELECT m.enrollment_id FROM evaluations v
                     JOIN evaluation_methods m ON m.id = v.method_id
                     WHERE v.id = ?1",
                    params![id],
                    |row| row.get(0),
                )
                .optional()?;
            let Some(enrollment_id) = enrollment_id else {
                return Ok(None);
            };
            tx.execute(
                "UPDATE evaluations SET score = ?1 WHERE id = ?2",
                params![score, id],
            )?;
            let enrollment = recompute_in(&tx, &enrollment_id)?;
            tx.commit()?;
            Ok(enrollment)
        })
        .await
        .map_err(map_tr_err)?
        .ok_or_else(|| not_found("evaluation", evaluation_id))
}

/// Insert an absence and recompute the enrollment.
pub async fn record_absence(
    db: &Database,
    enrollment_id: &str,
    absence: &NewAbsence,
) -> Result<Enrollment, AulaError> {
    let id = enrollment_id.to_string();
    let absence = absence.clone();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let exists = tx
                .query_row(
                    "SELECT 1 FROM enrollments WHERE id = ?1",
                    params![id],
                    |_| Ok(()),
                )
                .optional()?
                .is_some();
            if !exists {
                return Ok(None);
            }
            tx.execute(
                "INSERT INTO absences (id, enrollment_id, date, justified, justification, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    uuid::Uuid::new_v4().to_string(),
                    id,
                    absence.date,
                    absence.justified,
                    absence.justification,
                    now_iso(),
                ],
            )?;
            let enrollment = recompute_in(&tx, &id)?;
            tx.commit()?;
            Ok(enrollment)
        })
        .await
        .map_err(map_tr_err)?
        .ok_or_else(|| not_found("enrollment", enrollment_id))
}

/// Absences of an enrollment, most recent first.
pub async fn list_absences(
    db: &Database,
    enrollment_id: &str,
) -> Result<Vec<AbsenceRecord>, AulaError> {
    let enrollment_id = enrollment_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, enrollment_id, date, justified, justification, created_at
                 FROM absences WHERE enrollment_id = ?1
                 ORDER BY date DESC, created_at DESC",
            )?;
            let rows = stmt
                .query_map(params![enrollment_id], |row| {
                    Ok(AbsenceRecord {
                        id: row.get(0)?,
                        enrollment_id: row.get(1)?,
                        date: row.get(2)?,
                        justified: row.get(3)?,
                        justification: row.get(4)?,
                        created_at: row.get(5)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn recompute_enrollment(db: &Database, enrollment_id: &str) -> Result<Enrollment, AulaError> {
    let id = enrollment_id.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let enrollment = recompute_in(&tx, &id)?;
            tx.commit()?;
            Ok(enrollment)
        })
        .await
        .map_err(map_tr_err)?
        .ok_or_else(|| not_found("enrollment", enrollment_id))
}
