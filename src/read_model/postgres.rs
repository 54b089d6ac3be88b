use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::persistence::store::soft_delete::live_sql;
use crate::persistence::{PersistenceError, PgStore};
use super::{CourseFilter, CourseView, EnrollmentView, ReadModel, StudentFilter, StudentView};

#[async_trait]
impl ReadModel for PgStore {
    async fn list_students(&self, filter: &StudentFilter) -> Result<Vec<StudentView>, PersistenceError> {
        let sql = format!(
            "SELECT s.id, s.first_name, s.last_name, s.email
             FROM student s
             WHERE {live_student}
               AND ($1::text IS NULL OR s.email = $1)
               AND ($2::uuid IS NULL OR EXISTS (
                    SELECT 1 FROM enrollment e
                    JOIN course c ON c.id = e.course_id
                    WHERE e.student_id = s.id AND e.course_id = $2 AND {live_course}))
             ORDER BY s.last_name, s.first_name, s.id",
            live_student = live_sql("s"),
            live_course = live_sql("c"),
        );

        let rows = sqlx::query(&sql)
            .bind(filter.email.as_deref())
            .bind(filter.course_id)
            .fetch_all(self.pool())
            .await?;

        let mut students = Vec::with_capacity(rows.len());
        for row in &rows {
            students.push(StudentView {
                id: row.try_get("id")?,
                first_name: row.try_get("first_name")?,
                last_name: row.try_get("last_name")?,
                email: row.try_get("email")?,
                enrollments: Vec::new(),
            });
        }

        if students.is_empty() {
            return Ok(students);
        }

        let ids: Vec<Uuid> = students.iter().map(|s| s.id).collect();
        let sql = format!(
            "SELECT e.id, e.student_id, c.id AS course_id, c.name AS course_name
             FROM enrollment e
             JOIN course c ON c.id = e.course_id
             WHERE e.student_id = ANY($1) AND {}
             ORDER BY e.student_id, e.ordinal",
            live_sql("c")
        );
        let rows = sqlx::query(&sql).bind(&ids).fetch_all(self.pool()).await?;

        let mut by_student: HashMap<Uuid, Vec<EnrollmentView>> = HashMap::new();
        for row in &rows {
            let student_id: Uuid = row.try_get("student_id")?;
            by_student.entry(student_id).or_default().push(EnrollmentView {
                id: row.try_get("id")?,
                course_id: row.try_get("course_id")?,
                course_name: row.try_get("course_name")?,
            });
        }

        for student in &mut students {
            student.enrollments = by_student.remove(&student.id).unwrap_or_default();
        }

        Ok(students)
    }

    async fn list_courses(&self, filter: &CourseFilter) -> Result<Vec<CourseView>, PersistenceError> {
        let sql = format!(
            "SELECT c.id, c.name
             FROM course c
             WHERE {} AND ($1::text IS NULL OR strpos(lower(c.name), lower($1)) > 0)
             ORDER BY c.name, c.id",
            live_sql("c")
        );

        let rows = sqlx::query(&sql)
            .bind(filter.name_contains.as_deref())
            .fetch_all(self.pool())
            .await?;

        let mut courses = Vec::with_capacity(rows.len());
        for row in &rows {
            courses.push(CourseView {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
            });
        }

        Ok(courses)
    }
}
