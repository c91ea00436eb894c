// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Demo data so the assistant can be tried locally.

use aula_calc::AverageMethod;
use aula_core::AulaError;
use aula_core::types::NewAbsence;
use tracing::info;

use crate::database::Database;
use crate::queries::academic::{enrollments_for_student, recompute_enrollment, record_absence};
use crate::queries::admin::{
    NewClassSlot, NewCourse, NewEnrollment, NewEvaluation, insert_class_slot, insert_course,
    insert_enrollment, insert_evaluation, insert_method,
};

/// Who and when to seed.
#[derive(Debug, Clone)]
pub struct DemoSeed {
    pub student_id: String,
    pub period: String,
    pub min_average: f64,
    pub min_attendance: f64,
}

/// Outcome of [`seed_demo`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub enrollments: usize,
    /// The student already had enrollments in the period; nothing was written.
    pub skipped: bool,
}

struct DemoCourse {
    code: &'static str,
    name: &'static str,
    hours: i64,
    method: AverageMethod,
    evaluations: &'static [(&'static str, f64, Option<f64>, &'static str, bool)],
    absences: &'static [(&'static str, bool)],
    slots: &'static [(u32, &'static str, &'static str, &'static str)],
}

const COURSES: &[DemoCourse] = &[
    DemoCourse {
        code: "SE101",
        name: "Software Engineering",
        hours: 60,
        method: AverageMethod::Weighted,
        evaluations: &[
            ("Prova 1", 2.0, Some(7.0), "2025-09-15", false),
            ("Trabalho", 1.0, Some(8.5), "2025-10-20", false),
            ("Prova 2", 2.0, None, "2025-11-24", false),
        ],
        absences: &[("2025-08-18", false), ("2025-09-01", true)],
        slots: &[(1, "08:00", "09:40", "B-204"), (3, "08:00", "09:40", "B-204")],
    },
    DemoCourse {
        code: "DB201",
        name: "Databases",
        hours: 60,
        method: AverageMethod::Simple,
        evaluations: &[
            ("Lista 1", 1.0, Some(9.0), "2025-09-05", false),
            ("Lista 2", 1.0, Some(6.0), "2025-10-03", false),
            ("Projeto", 2.0, None, "2025-11-28", false),
        ],
        absences: &[
            ("2025-08-19", false),
            ("2025-08-26", false),
            ("2025-09-09", false),
            ("2025-09-23", false),
        ],
        slots: &[(2, "10:00", "11:40", "LAB-3"), (4, "10:00", "11:40", "LAB-3")],
    },
    DemoCourse {
        code: "MAT101",
        name: "Calculus I",
        hours: 90,
        method: AverageMethod::Substitution,
        evaluations: &[
            ("P1", 1.0, Some(3.0), "2025-09-12", false),
            ("P2", 1.0, Some(6.0), "2025-10-17", false),
            ("P3", 1.0, None, "2025-11-21", false),
            ("Reposição", 1.0, None, "2025-12-05", true),
        ],
        absences: &[
            ("2025-08-15", false),
            ("2025-08-22", false),
            ("2025-09-19", true),
        ],
        slots: &[(1, "14:00", "15:40", "A-101"), (5, "14:00", "15:40", "A-101")],
    },
    DemoCourse {
        code: "NET301",
        name: "Computer Networks",
        hours: 45,
        method: AverageMethod::Weighted,
        evaluations: &[
            ("Prova", 1.0, Some(8.0), "2025-10-09", false),
            ("Laboratório", 1.0, Some(7.0), "2025-11-13", false),
        ],
        absences: &[("2025-09-04", false)],
        slots: &[(4, "19:00", "22:00", "LAB-1")],
    },
];

/// Create the demo courses, enrollments, evaluations, absences and schedule.
///
/// Does nothing when the student already has enrollments in the period.
pub async fn seed_demo(db: &Database, seed: &DemoSeed) -> Result<SeedReport, AulaError> {
    let existing = enrollments_for_student(db, &seed.student_id, Some(&seed.period)).await?;
    if !existing.is_empty() {
        info!(student_id = %seed.student_id, period = %seed.period, "student already seeded");
        return Ok(SeedReport {
            enrollments: existing.len(),
            skipped: true,
        });
    }

    for course in COURSES {
        let course_id = insert_course(
            db,
            &NewCourse {
                code: course.code.to_string(),
                name: course.name.to_string(),
                total_hours: course.hours,
            },
        )
        .await?;

        let enrollment_id = insert_enrollment(
            db,
            &NewEnrollment {
                student_id: seed.student_id.clone(),
                course_id: course_id.clone(),
                period: seed.period.clone(),
                min_average: seed.min_average,
                min_attendance: seed.min_attendance,
            },
        )
        .await?;

        let method_id = insert_method(db, &enrollment_id, course.method, None).await?;
        for &(name, weight, score, due, substitute) in course.evaluations {
            insert_evaluation(
                db,
                &method_id,
                &NewEvaluation {
                    name: name.to_string(),
                    weight,
                    score,
                    due_date: Some(due.to_string()),
                    substitute,
                    ..NewEvaluation::default()
                },
            )
            .await?;
        }

        for &(date, justified) in course.absences {
            record_absence(
                db,
                &enrollment_id,
                &NewAbsence {
                    date: date.to_string(),
                    justified,
                    justification: justified.then(|| "atestado médico".to_string()),
                },
            )
            .await?;
        }

        for &(weekday, start, end, room) in course.slots {
            insert_class_slot(
                db,
                &NewClassSlot {
                    course_id: course_id.clone(),
                    period: seed.period.clone(),
                    weekday,
                    start_time: start.to_string(),
                    end_time: Some(end.to_string()),
                    room: Some(room.to_string()),
                },
            )
            .await?;
        }

        recompute_enrollment(db, &enrollment_id).await?;
    }

    info!(
        student_id = %seed.student_id,
        period = %seed.period,
        courses = COURSES.len(),
        "demo data seeded"
    );
    Ok(SeedReport {
        enrollments: COURSES.len(),
        skipped: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::schedule::class_schedule;
    use aula_calc::EnrollmentStatus;
    use tempfile::tempdir;

    fn demo(student: &str) -> DemoSeed {
        DemoSeed {
            student_id: student.to_string(),
            period: "2025.2".to_string(),
            min_average: 5.0,
            min_attendance: 75.0,
        }
    }

    #[tokio::test]
    async fn seeds_consistent_enrollments() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("seed.db").to_str().unwrap())
            .await
            .unwrap();

        let report = seed_demo(&db, &demo("stu-1")).await.unwrap();
        assert_eq!(report, SeedReport { enrollments: 4, skipped: false });

        let views = enrollments_for_student(&db, "stu-1", Some("2025.2")).await.unwrap();
        let by_code = |code: &str| {
            views
                .iter()
                .find(|v| v.course.code == code)
                .map(|v| v.enrollment.clone())
                .unwrap()
        };

        let se = by_code("SE101");
        assert_eq!(se.average, 7.5);
        assert_eq!(se.absences, 2);
        assert_eq!(se.attendance, 97);
        assert_eq!(se.status, EnrollmentStatus::InProgress);

        let db201 = by_code("DB201");
        assert_eq!(db201.average, 7.5);

        let net = by_code("NET301");
        assert_eq!(net.average, 7.5);
        assert_eq!(net.status, EnrollmentStatus::Approved);

        assert_eq!(class_schedule(&db, "stu-1", "2025.2").await.unwrap().len(), 7);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn seeding_twice_is_a_no_op() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("seed.db").to_str().unwrap())
            .await
            .unwrap();
        seed_demo(&db, &demo("stu-1")).await.unwrap();
        let again = seed_demo(&db, &demo("stu-1")).await.unwrap();
        assert!(again.skipped);

        let other = seed_demo(&db, &demo("stu-2")).await.unwrap();
        assert!(!other.skipped);
        assert_eq!(
            enrollments_for_student(&db, "stu-1", None).await.unwrap().len(),
            4
        );
        db.close().await.unwrap();
    }
}
