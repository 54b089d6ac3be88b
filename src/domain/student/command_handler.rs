use std::sync::Arc;
use uuid::Uuid;

use crate::domain::errors::CommandError;
use crate::messaging::{dispatch_committed, EventDispatcher};
use crate::persistence::{Persistence, UnitOfWork};

use super::aggregate::Student;
use super::commands::StudentCommand;
use super::value_objects::{Email, Name};

// ============================================================================
// Student Command Handler
// ============================================================================
//
// Orchestrates: Command → Unit of Work → Aggregate → Commit → Dispatch
//
// Every check short-circuits. A rejected command returns before commit, so
// the unit of work is dropped and nothing is written or dispatched.
//
// ============================================================================

pub struct StudentCommandHandler {
    persistence: Arc<dyn Persistence>,
    dispatcher: Arc<dyn EventDispatcher>,
}

impl StudentCommandHandler {
    pub fn new(persistence: Arc<dyn Persistence>, dispatcher: Arc<dyn EventDispatcher>) -> Self {
        Self { persistence, dispatcher }
    }

    /// Handle a command and return the id of the affected student
    pub async fn handle(&self, command: StudentCommand) -> Result<Uuid, CommandError> {
        let command_name = command.name();
        tracing::info!(command = command_name, "Handling student command");

        let mut uow = self.persistence.begin().await?;

        let result = match command {
            StudentCommand::Enroll { course_id, email_address, first_name, last_name } => {
                enroll(uow.as_mut(), course_id, &email_address, &first_name, &last_name).await
            }
            StudentCommand::EditPersonalInfo { student_id, email_address, first_name, last_name } => {
                edit_personal_info(uow.as_mut(), student_id, &email_address, &first_name, &last_name).await
            }
            StudentCommand::Disenroll { student_id, course_id } => {
                disenroll(uow.as_mut(), student_id, course_id).await
            }
        };

        let student_id = match result {
            Ok(id) => id,
            Err(e) => {
                if e.is_business() {
                    tracing::warn!(command = command_name, reason = %e, "Student command rejected");
                }
                return Err(e);
            }
        };

        let events = uow.commit().await?;
        tracing::debug!(command = command_name, student_id = %student_id, events = events.len(), "Student command committed");

        dispatch_committed(self.dispatcher.as_ref(), events).await;

        Ok(student_id)
    }
}

fn parse_email(raw: &str) -> Result<Email, CommandError> {
    Email::create(raw).map_err(|_| CommandError::validation("Email is invalid."))
}

fn parse_name(first_name: &str, last_name: &str) -> Result<Name, CommandError> {
    Name::create(first_name, last_name).map_err(|_| CommandError::validation("Name is invalid."))
}

async fn load_student(uow: &mut dyn UnitOfWork, student_id: Uuid) -> Result<Student, CommandError> {
    uow.find_student_by_id(student_id)
        .await?
        .ok_or_else(|| CommandError::not_found("Student doesn't exist."))
}

async fn enroll(
    uow: &mut dyn UnitOfWork,
    course_id: Uuid,
    email_address: &str,
    first_name: &str,
    last_name: &str,
) -> Result<Uuid, CommandError> {
    let course = uow
        .find_course_by_id(course_id)
        .await?
        .ok_or_else(|| CommandError::not_found("Course doesn't exist."))?;

    let email = parse_email(email_address)?;

    match uow.find_student_by_email(&email).await? {
        None => {
            let name = parse_name(first_name, last_name)?;
            let student = Student::create(Uuid::new_v4(), name, email, course);
            let student_id = student.id();

            tracing::info!(student_id = %student_id, course_id = %course_id, "Enrolling new student");
            uow.add_student(student);
            Ok(student_id)
        }
        Some(mut student) => {
            student.enroll_in(&course)?;
            let student_id = student.id();

            tracing::info!(student_id = %student_id, course_id = %course_id, "Enrolling existing student");
            uow.update_student(student);
            Ok(student_id)
        }
    }
}

async fn edit_personal_info(
    uow: &mut dyn UnitOfWork,
    student_id: Uuid,
    email_address: &str,
    first_name: &str,
    last_name: &str,
) -> Result<Uuid, CommandError> {
    let mut student = load_student(uow, student_id).await?;
    let email = parse_email(email_address)?;
    let name = parse_name(first_name, last_name)?;

    if let Some(owner) = uow.find_student_by_email(&email).await? {
        if owner.id() != student_id {
            return Err(CommandError::conflict("Email is already in use."));
        }
    }

    student.edit_personal_info(Some(name), Some(email))?;
    uow.update_student(student);
    Ok(student_id)
}

async fn disenroll(uow: &mut dyn UnitOfWork, student_id: Uuid, course_id: Uuid) -> Result<Uuid, CommandError> {
    let mut student = load_student(uow, student_id).await?;
    let course = uow
        .find_course_by_id(course_id)
        .await?
        .ok_or_else(|| CommandError::not_found("Course doesn't exist."))?;

    student.disenroll(&course)?;

    tracing::info!(student_id = %student_id, course_id = %course_id, "Disenrolling student");
    uow.update_student(student);
    Ok(student_id)
}

// ============================================================================
// Unit Tests
// ============================================================================
