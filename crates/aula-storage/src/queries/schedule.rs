// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Weekly class schedule queries.

use aula_core::AulaError;
use aula_core::types::ClassSlot;
use rusqlite::params;

use crate::database::{Database, map_tr_err};

/// Class slots of every non-withdrawn enrollment of `student_id` in `period`,
/// ordered by weekday and start time.
pub async fn class_schedule(
    db: &Database,
    student_id: &str,
    period: &str,
) -> Result<Vec<ClassSlot>, AulaError> {
    let student_id = student_id.to_string();
    let period = period.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT s.id, s.course_id, c.code, c.name, s.period, s.weekday,
                        s.start_time, s.end_time, s.room
                 FROM class_slots s
                 JOIN courses c ON c.id = s.course_id
                 JOIN enrollments e ON e.course_id = s.course_id AND e.period = s.period
                 WHERE e.student_id = ?1 AND s.period = ?2 AND e.status != 'withdrawn'
                 ORDER BY s.weekday ASC, s.start_time ASC",
            )?;
            let slots = stmt
                .query_map(params![student_id, period], |row| {
                    Ok(ClassSlot {
                        id: row.get(0)?,
                        course_id: row.get(1)?,
                        course_code: row.get(2)?,
                        course_name: row.get(3)?,
                        period: row.get(4)?,
                        weekday: row.get(5)?,
                        start_time: row.get(6)?,
                        end_time: row.get(7)?,
                        room: row.get(8)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(slots)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::admin::{
        NewClassSlot, NewCourse, NewEnrollment, insert_class_slot, insert_course,
        insert_enrollment, set_enrollment_status,
    };
    use aula_calc::EnrollmentStatus;
    use tempfile::tempdir;

    async fn enroll(db: &Database, student: &str, code: &str) -> (String, String) {
        let course = insert_course(
            db,
            &NewCourse {
                code: code.into(),
                name: format!("Course {code}"),
                total_hours: 60,
            },
        )
        .await
        .unwrap();
        let enrollment = insert_enrollment(
            db,
            &NewEnrollment {
                student_id: student.into(),
                course_id: course.clone(),
                period: "2025.2".into(),
                min_average: 5.0,
                min_attendance: 75.0,
            },
        )
        .await
        .unwrap();
        (course, enrollment)
    }

    async fn slot(db: &Database, course: &str, weekday: u32, start: &str) {
        insert_class_slot(
            db,
            &NewClassSlot {
                course_id: course.into(),
                period: "2025.2".into(),
                weekday,
                start_time: start.into(),
                end_time: None,
                room: Some("B-101".into()),
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn schedule_is_scoped_and_ordered() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("test.db").to_str().unwrap())
            .await
            .unwrap();

        let (se, _) = enroll(&db, "stu-1", "SE101").await;
        let (net, net_enrollment) = enroll(&db, "stu-1", "NET301").await;
        let (other, _) = enroll(&db, "stu-2", "ART100").await;

        slot(&db, &se, 3, "08:00").await;
        slot(&db, &se, 1, "10:00").await;
        slot(&db, &net, 1, "08:00").await;
        slot(&db, &other, 2, "08:00").await;

        let slots = class_schedule(&db, "stu-1", "2025.2").await.unwrap();
        let keys: Vec<(u32, &str, &str)> = slots
            .iter()
            .map(|s| (s.weekday, s.start_time.as_str(), s.course_code.as_str()))
            .collect();
        assert_eq!(
            keys,
            [(1, "08:00", "NET301"), (1, "10:00", "SE101"), (3, "08:00", "SE101")]
        );

        set_enrollment_status(&db, &net_enrollment, EnrollmentStatus::Withdrawn)
            .await
            .unwrap();
        let slots = class_schedule(&db, "stu-1", "2025.2").await.unwrap();
        assert!(slots.iter().all(|s| s.course_code == "SE101"));

        assert!(class_schedule(&db, "stu-1", "2024.1").await.unwrap().is_empty());
        db.close().await.unwrap();
    }
}
