use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgConnection, PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::domain::course::Course;
use crate::domain::student::{Email, Enrollment, Name, Student};
use crate::persistence::core::OutboxMessage;
use crate::persistence::PersistenceError;
use super::soft_delete::{ensure_soft_delete_indexes, live_sql};
use super::unit_of_work::{drain_staged_events, Persistence, StagedChange, UnitOfWork};

// ============================================================================
// PostgreSQL Store
// ============================================================================
//
// Each unit of work owns a database transaction opened at `begin`. Reads run
// inside it; staged writes are flushed and committed together. A dropped,
// uncommitted transaction is rolled back by sqlx.
//
// ============================================================================

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, PersistenceError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;

        tracing::info!(max_connections = config.max_connections, "Connected to PostgreSQL");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply schema migrations, then register the soft delete filters
    pub async fn migrate(&self) -> Result<(), PersistenceError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        ensure_soft_delete_indexes(&self.pool).await?;

        tracing::info!("Database schema is up to date");
        Ok(())
    }
}

#[async_trait]
impl Persistence for PgStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, PersistenceError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgUnitOfWork {
            tx: Some(tx),
            staged: Vec::new(),
        }))
    }

    async fn ping(&self) -> Result<(), PersistenceError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

pub struct PgUnitOfWork {
    tx: Option<Transaction<'static, Postgres>>,
    staged: Vec<StagedChange>,
}

impl PgUnitOfWork {
    fn conn(&mut self) -> Result<&mut PgConnection, PersistenceError> {
        match self.tx.as_mut() {
            Some(tx) => Ok(&mut **tx),
            None => Err(PersistenceError::AlreadyCommitted),
        }
    }

    async fn load_student(&mut self, row: Option<PgRow>) -> Result<Option<Student>, PersistenceError> {
        let Some(row) = row else {
            return Ok(None);
        };

        let id: Uuid = row.try_get("id")?;
        let first_name: String = row.try_get("first_name")?;
        let last_name: String = row.try_get("last_name")?;
        let email: String = row.try_get("email")?;
        let is_deleted: bool = row.try_get("is_deleted")?;

        let name = Name::create(&first_name, &last_name)
            .map_err(|e| PersistenceError::CorruptRow(format!("student {id}: {e}")))?;
        let email = Email::create(&email)
            .map_err(|e| PersistenceError::CorruptRow(format!("student {id}: {e}")))?;

        let enrollments = load_enrollments(self.conn()?, id).await?;

        Ok(Some(Student::restore(id, name, email, enrollments, is_deleted)))
    }
}

const STUDENT_COLUMNS: &str = "s.id, s.first_name, s.last_name, s.email, s.is_deleted";

fn course_from_row(row: &PgRow) -> Result<Course, sqlx::Error> {
    Ok(Course {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        is_deleted: row.try_get("is_deleted")?,
    })
}

async fn load_enrollments(conn: &mut PgConnection, student_id: Uuid) -> Result<Vec<Enrollment>, PersistenceError> {
    let sql = format!(
        "SELECT e.id, c.id AS course_id, c.name AS course_name, c.is_deleted AS course_is_deleted
         FROM enrollment e
         JOIN course c ON c.id = e.course_id
         WHERE e.student_id = $1 AND {}
         ORDER BY e.ordinal ASC",
        live_sql("c")
    );

    let rows = sqlx::query(&sql).bind(student_id).fetch_all(conn).await?;

    let mut enrollments = Vec::with_capacity(rows.len());
    for row in &rows {
        let course = Course {
            id: row.try_get("course_id")?,
            name: row.try_get("course_name")?,
            is_deleted: row.try_get("course_is_deleted")?,
        };
        enrollments.push(Enrollment::restore(row.try_get("id")?, student_id, course));
    }

    Ok(enrollments)
}

async fn write_student(conn: &mut PgConnection, student: &Student, insert: bool) -> Result<(), PersistenceError> {
    use crate::persistence::core::SoftDeletable;

    if insert {
        sqlx::query(
            "INSERT INTO student (id, first_name, last_name, email, is_deleted)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(student.id())
        .bind(student.name().first_name())
        .bind(student.name().last_name())
        .bind(student.email().as_str())
        .bind(student.is_deleted())
        .execute(&mut *conn)
        .await?;
    } else {
        sqlx::query(
            "UPDATE student
             SET first_name = $2, last_name = $3, email = $4, is_deleted = $5, updated_at = now()
             WHERE id = $1",
        )
        .bind(student.id())
        .bind(student.name().first_name())
        .bind(student.name().last_name())
        .bind(student.email().as_str())
        .bind(student.is_deleted())
        .execute(&mut *conn)
        .await?;
    }

    // Only the enrollment delta is written: rows this unit of work never
    // loaded or touched belong to someone else.
    if !student.removed_enrollments().is_empty() {
        sqlx::query("DELETE FROM enrollment WHERE student_id = $1 AND id = ANY($2)")
            .bind(student.id())
            .bind(student.removed_enrollments())
            .execute(&mut *conn)
            .await?;
    }

    for enrollment in student.added_enrollments() {
        sqlx::query(
            "INSERT INTO enrollment (id, student_id, course_id, ordinal)
             SELECT $1, $2, $3, COALESCE(MAX(ordinal) + 1, 0) FROM enrollment WHERE student_id = $2",
        )
        .bind(enrollment.id())
        .bind(student.id())
        .bind(enrollment.course().id)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

async fn apply_change(conn: &mut PgConnection, change: &StagedChange) -> Result<(), PersistenceError> {
    match change {
        StagedChange::AddStudent(student) => write_student(conn, student, true).await,
        StagedChange::UpdateStudent(student) => write_student(conn, student, false).await,
        StagedChange::AddCourse(course) => {
            sqlx::query("INSERT INTO course (id, name, is_deleted) VALUES ($1, $2, $3)")
                .bind(course.id)
                .bind(&course.name)
                .bind(course.is_deleted)
                .execute(conn)
                .await?;
            Ok(())
        }
        StagedChange::RemoveCourse(course) => {
            sqlx::query("UPDATE course SET is_deleted = TRUE, updated_at = now() WHERE id = $1")
                .bind(course.id)
                .execute(conn)
                .await?;
            Ok(())
        }
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn find_course_by_id(&mut self, id: Uuid) -> Result<Option<Course>, PersistenceError> {
        let sql = format!(
            "SELECT c.id, c.name, c.is_deleted FROM course c WHERE c.id = $1 AND {}",
            live_sql("c")
        );
        let row = sqlx::query(&sql).bind(id).fetch_optional(self.conn()?).await?;
        Ok(row.as_ref().map(course_from_row).transpose()?)
    }

    async fn find_course_by_name(&mut self, name: &str) -> Result<Option<Course>, PersistenceError> {
        let sql = format!(
            "SELECT c.id, c.name, c.is_deleted FROM course c WHERE c.name = $1 AND {} LIMIT 1",
            live_sql("c")
        );
        let row = sqlx::query(&sql).bind(name).fetch_optional(self.conn()?).await?;
        Ok(row.as_ref().map(course_from_row).transpose()?)
    }

    async fn find_student_by_id(&mut self, id: Uuid) -> Result<Option<Student>, PersistenceError> {
        let sql = format!(
            "SELECT {STUDENT_COLUMNS} FROM student s WHERE s.id = $1 AND {}",
            live_sql("s")
        );
        let row = sqlx::query(&sql).bind(id).fetch_optional(self.conn()?).await?;
        self.load_student(row).await
    }

    async fn find_student_by_email(&mut self, email: &Email) -> Result<Option<Student>, PersistenceError> {
        let sql = format!(
            "SELECT {STUDENT_COLUMNS} FROM student s WHERE s.email = $1 AND {} LIMIT 1",
            live_sql("s")
        );
        let row = sqlx::query(&sql).bind(email.as_str()).fetch_optional(self.conn()?).await?;
        self.load_student(row).await
    }

    fn add_student(&mut self, student: Student) {
        self.staged.push(StagedChange::AddStudent(student));
    }

    fn update_student(&mut self, student: Student) {
        self.staged.push(StagedChange::UpdateStudent(student));
    }

    fn add_course(&mut self, course: Course) {
        self.staged.push(StagedChange::AddCourse(course));
    }

    fn remove_course(&mut self, course: Course) {
        self.staged.push(StagedChange::RemoveCourse(course));
    }

    async fn commit(&mut self) -> Result<Vec<OutboxMessage>, PersistenceError> {
        let mut tx = self.tx.take().ok_or(PersistenceError::AlreadyCommitted)?;
        let mut staged = std::mem::take(&mut self.staged);

        for change in &staged {
            apply_change(&mut *tx, change).await?;
        }

        // Serialize before committing so a bad payload cannot surface after
        // the data is already durable.
        let outbox = drain_staged_events(&mut staged)?;

        tx.commit().await?;

        tracing::debug!(
            changes = staged.len(),
            events = outbox.len(),
            "Committed unit of work"
        );

        Ok(outbox)
    }
}
