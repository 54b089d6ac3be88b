use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::course::Course;
use crate::domain::student::{Email, Student};
use crate::persistence::core::OutboxMessage;
use crate::persistence::PersistenceError;

// ============================================================================
// Unit of Work - Persistence Gateway Contract
// ============================================================================
//
// One unit of work per command:
// 1. Read phase: find_* queries, each filtered to live (not deleted) rows
// 2. Staging: add_* / update_* / remove_* record intended writes in memory
// 3. Commit: all staged writes land in one transaction, then the pending
//    domain events of staged aggregates are returned for dispatch
//
// Dropping a unit of work without committing discards every staged change.
//
// ============================================================================

#[async_trait]
pub trait UnitOfWork: Send {
    async fn find_course_by_id(&mut self, id: Uuid) -> Result<Option<Course>, PersistenceError>;

    async fn find_course_by_name(&mut self, name: &str) -> Result<Option<Course>, PersistenceError>;

    async fn find_student_by_id(&mut self, id: Uuid) -> Result<Option<Student>, PersistenceError>;

    async fn find_student_by_email(&mut self, email: &Email) -> Result<Option<Student>, PersistenceError>;

    fn add_student(&mut self, student: Student);

    /// Stage the new state of a previously loaded student
    fn update_student(&mut self, student: Student);

    fn add_course(&mut self, course: Course);

    /// Stage a soft delete
    fn remove_course(&mut self, course: Course);

    /// Apply staged changes atomically and return the drained domain events.
    ///
    /// Events are only returned when the commit succeeded.
    async fn commit(&mut self) -> Result<Vec<OutboxMessage>, PersistenceError>;
}

/// Factory for units of work
#[async_trait]
pub trait Persistence: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, PersistenceError>;

    /// Cheap connectivity probe for health checks
    async fn ping(&self) -> Result<(), PersistenceError>;
}

/// A write recorded by a unit of work, applied on commit
#[derive(Debug)]
pub(crate) enum StagedChange {
    AddStudent(Student),
    UpdateStudent(Student),
    AddCourse(Course),
    RemoveCourse(Course),
}

impl StagedChange {
    pub(crate) fn student_mut(&mut self) -> Option<&mut Student> {
        match self {
            StagedChange::AddStudent(student) | StagedChange::UpdateStudent(student) => Some(student),
            StagedChange::AddCourse(_) | StagedChange::RemoveCourse(_) => None,
        }
    }
}

/// Drain pending events from every staged aggregate
pub(crate) fn drain_staged_events(
    staged: &mut [StagedChange],
) -> Result<Vec<OutboxMessage>, PersistenceError> {
    use crate::persistence::core::HasDomainEvents;

    let mut outbox = Vec::new();
    for change in staged.iter_mut() {
        if let Some(student) = change.student_mut() {
            outbox.extend(student.drain_outbox()?);
        }
    }
    Ok(outbox)
}
