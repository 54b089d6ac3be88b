use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::course::Course;
use crate::domain::student::{Email, Enrollment, Student};
use crate::persistence::core::{OutboxMessage, SoftDeletable};
use crate::persistence::PersistenceError;
use super::soft_delete::is_live;
use super::unit_of_work::{drain_staged_events, Persistence, StagedChange, UnitOfWork};

// ============================================================================
// In-Memory Store
// ============================================================================
//
// Same contract as the PostgreSQL store: reads see committed, live records;
// staged writes are applied under one lock on commit. Used by tests and by
// `STORE=memory` local runs.
//
// ============================================================================

#[derive(Debug, Default)]
pub(crate) struct MemoryState {
    pub(crate) courses: Vec<Course>,
    pub(crate) students: Vec<Student>,
}

impl MemoryState {
    fn live_course(&self, id: Uuid) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id && is_live(*c))
    }

    /// Copy of a stored student with enrollments to deleted courses hidden
    pub(crate) fn visible_student(&self, student: &Student) -> Student {
        let enrollments = student
            .enrollments()
            .iter()
            .filter_map(|e| {
                self.live_course(e.course().id)
                    .map(|course| Enrollment::restore(e.id(), student.id(), course.clone()))
            })
            .collect();

        Student::restore(
            student.id(),
            student.name().clone(),
            student.email().clone(),
            enrollments,
            student.is_deleted(),
        )
    }

    /// Mirrors the unique (student, course) constraint on enrollment
    fn check(&self, change: &StagedChange) -> Result<(), PersistenceError> {
        let StagedChange::UpdateStudent(student) = change else {
            return Ok(());
        };
        let Some(stored) = self.students.iter().find(|s| s.id() == student.id()) else {
            return Ok(());
        };

        for added in student.added_enrollments() {
            let taken = stored.enrollments().iter().any(|e| {
                e.course().id == added.course().id && !student.removed_enrollments().contains(&e.id())
            });
            if taken {
                return Err(PersistenceError::Conflict(format!(
                    "student {} is already enrolled in course {}",
                    student.id(),
                    added.course().id
                )));
            }
        }
        Ok(())
    }

    /// Write the row and the enrollment delta. Stored enrollments the unit of
    /// work never touched, hidden or committed by others, are kept.
    fn save_student(&mut self, student: &Student) {
        let added: Vec<Enrollment> = student.added_enrollments().cloned().collect();

        match self.students.iter_mut().find(|s| s.id() == student.id()) {
            Some(stored) => {
                let mut enrollments: Vec<Enrollment> = stored
                    .enrollments()
                    .iter()
                    .filter(|e| !student.removed_enrollments().contains(&e.id()))
                    .cloned()
                    .collect();
                enrollments.extend(added);

                *stored = Student::restore(
                    student.id(),
                    student.name().clone(),
                    student.email().clone(),
                    enrollments,
                    student.is_deleted(),
                );
            }
            None => self.students.push(Student::restore(
                student.id(),
                student.name().clone(),
                student.email().clone(),
                added,
                student.is_deleted(),
            )),
        }
    }

    fn apply(&mut self, change: &StagedChange) {
        match change {
            StagedChange::AddStudent(student) | StagedChange::UpdateStudent(student) => {
                self.save_student(student);
            }
            StagedChange::AddCourse(course) => self.courses.push(course.clone()),
            StagedChange::RemoveCourse(course) => {
                if let Some(stored) = self.courses.iter_mut().find(|c| c.id == course.id) {
                    stored.mark_deleted();
                }
            }
        }
    }
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
    unavailable: Arc<AtomicBool>,
    fail_next_commit: Arc<AtomicBool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a course directly, bypassing the command layer
    pub async fn seed_course(&self, course: Course) {
        self.state.lock().await.courses.push(course);
    }

    /// Simulate an outage: every begin, ping and commit fails while set
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make the next commit fail while reads and `begin` keep working
    #[cfg(test)]
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    pub(crate) fn state(&self) -> &Arc<Mutex<MemoryState>> {
        &self.state
    }

    pub(crate) fn check_available(&self) -> Result<(), PersistenceError> {
        check_available(&self.unavailable)
    }
}

fn check_available(flag: &AtomicBool) -> Result<(), PersistenceError> {
    if flag.load(Ordering::SeqCst) {
        return Err(PersistenceError::Unavailable("in-memory store marked unavailable".to_string()));
    }
    Ok(())
}

#[async_trait]
impl Persistence for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, PersistenceError> {
        self.check_available()?;
        Ok(Box::new(InMemoryUnitOfWork {
            state: self.state.clone(),
            unavailable: self.unavailable.clone(),
            fail_next_commit: self.fail_next_commit.clone(),
            staged: Vec::new(),
            committed: false,
        }))
    }

    async fn ping(&self) -> Result<(), PersistenceError> {
        self.check_available()
    }
}

pub struct InMemoryUnitOfWork {
    state: Arc<Mutex<MemoryState>>,
    unavailable: Arc<AtomicBool>,
    fail_next_commit: Arc<AtomicBool>,
    staged: Vec<StagedChange>,
    committed: bool,
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn find_course_by_id(&mut self, id: Uuid) -> Result<Option<Course>, PersistenceError> {
        let state = self.state.lock().await;
        Ok(state.live_course(id).cloned())
    }

    async fn find_course_by_name(&mut self, name: &str) -> Result<Option<Course>, PersistenceError> {
        let state = self.state.lock().await;
        Ok(state.courses.iter().find(|c| c.name == name && is_live(*c)).cloned())
    }

    async fn find_student_by_id(&mut self, id: Uuid) -> Result<Option<Student>, PersistenceError> {
        let state = self.state.lock().await;
        Ok(state
            .students
            .iter()
            .find(|s| s.id() == id && is_live(*s))
            .map(|s| state.visible_student(s)))
    }

    async fn find_student_by_email(&mut self, email: &Email) -> Result<Option<Student>, PersistenceError> {
        let state = self.state.lock().await;
        Ok(state
            .students
            .iter()
            .find(|s| s.email() == email && is_live(*s))
            .map(|s| state.visible_student(s)))
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
        if self.committed {
            return Err(PersistenceError::AlreadyCommitted);
        }
        check_available(&self.unavailable)?;
        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable("commit rejected".to_string()));
        }

        let mut state = self.state.lock().await;
        for change in &self.staged {
            state.check(change)?;
        }

        let mut staged = std::mem::take(&mut self.staged);
        let outbox = drain_staged_events(&mut staged)?;

        for change in &staged {
            state.apply(change);
        }
        self.committed = true;

        Ok(outbox)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
