use std::time::Instant;

use actix_web::{web, HttpResponse, Responder};
use uuid::Uuid;

use crate::domain::course::CourseCommand;
use crate::domain::student::StudentCommand;
use crate::domain::CommandError;
use crate::read_model::{CourseFilter, StudentFilter};
use super::inputs::{DisenrollInput, EditPersonalInfoInput, EnrollStudentInput, RegisterNewCourseInput};
use super::response::{command_response, internal_error};
use super::AppState;

fn outcome(result: &Result<Uuid, CommandError>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(e) => e.kind(),
    }
}

async fn run_student_command(state: &AppState, command: StudentCommand) -> HttpResponse {
    let name = command.name();
    let started = Instant::now();
    let result = state.students.handle(command).await;
    state.metrics.record_command(name, outcome(&result), started.elapsed().as_secs_f64());
    command_response(name, result)
}

async fn run_course_command(state: &AppState, command: CourseCommand) -> HttpResponse {
    let name = command.name();
    let started = Instant::now();
    let result = state.courses.handle(command).await;
    state.metrics.record_command(name, outcome(&result), started.elapsed().as_secs_f64());
    command_response(name, result)
}

// ============================================================================
// Commands
// ============================================================================

pub async fn enroll_student(state: web::Data<AppState>, input: web::Json<EnrollStudentInput>) -> impl Responder {
    run_student_command(&state, input.into_inner().into()).await
}

pub async fn register_new_course(
    state: web::Data<AppState>,
    input: web::Json<RegisterNewCourseInput>,
) -> impl Responder {
    run_course_command(&state, input.into_inner().into()).await
}

pub async fn edit_personal_info(
    state: web::Data<AppState>,
    student_id: web::Path<Uuid>,
    input: web::Json<EditPersonalInfoInput>,
) -> impl Responder {
    let command = input.into_inner().into_command(student_id.into_inner());
    run_student_command(&state, command).await
}

pub async fn disenroll_student(
    state: web::Data<AppState>,
    student_id: web::Path<Uuid>,
    input: web::Json<DisenrollInput>,
) -> impl Responder {
    let command = StudentCommand::Disenroll {
        student_id: student_id.into_inner(),
        course_id: input.course_id,
    };
    run_student_command(&state, command).await
}

pub async fn remove_course(state: web::Data<AppState>, course_id: web::Path<Uuid>) -> impl Responder {
    run_course_command(&state, CourseCommand::Remove { course_id: course_id.into_inner() }).await
}

// ============================================================================
// Queries
// ============================================================================

pub async fn list_students(state: web::Data<AppState>, filter: web::Query<StudentFilter>) -> impl Responder {
    match state.read_model.list_students(&filter).await {
        Ok(students) => HttpResponse::Ok().json(students),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list students");
            internal_error()
        }
    }
}

pub async fn list_courses(state: web::Data<AppState>, filter: web::Query<CourseFilter>) -> impl Responder {
    match state.read_model.list_courses(&filter).await {
        Ok(courses) => HttpResponse::Ok().json(courses),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list courses");
            internal_error()
        }
    }
}
