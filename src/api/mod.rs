// ============================================================================
// HTTP API
// ============================================================================
//
// JSON over actix-web. Command endpoints answer with a `ResponseMessage`
// envelope; query endpoints answer with plain lists.
//
//   POST   /students/enroll
//   PUT    /students/{id}/personal-info
//   POST   /students/{id}/disenroll
//   GET    /students?email=&course_id=
//   POST   /courses
//   DELETE /courses/{id}
//   GET    /courses?name_contains=
//   GET    /health
//
// ============================================================================

mod health;
mod inputs;
mod response;
mod routes;

use std::sync::Arc;

use actix_web::web;

use crate::domain::course::CourseCommandHandler;
use crate::domain::student::StudentCommandHandler;
use crate::messaging::EventDispatcher;
use crate::metrics::Metrics;
use crate::persistence::Persistence;
use crate::read_model::ReadModel;

pub struct AppState {
    students: StudentCommandHandler,
    courses: CourseCommandHandler,
    read_model: Arc<dyn ReadModel>,
    persistence: Arc<dyn Persistence>,
    metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(
        persistence: Arc<dyn Persistence>,
        read_model: Arc<dyn ReadModel>,
        dispatcher: Arc<dyn EventDispatcher>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            students: StudentCommandHandler::new(persistence.clone(), dispatcher.clone()),
            courses: CourseCommandHandler::new(persistence.clone(), dispatcher),
            read_model,
            persistence,
            metrics,
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/students")
            .route("", web::get().to(routes::list_students))
            .route("/enroll", web::post().to(routes::enroll_student))
            .route("/{id}/personal-info", web::put().to(routes::edit_personal_info))
            .route("/{id}/disenroll", web::post().to(routes::disenroll_student)),
    )
    .service(
        web::scope("/courses")
            .route("", web::get().to(routes::list_courses))
            .route("", web::post().to(routes::register_new_course))
            .route("/{id}", web::delete().to(routes::remove_course)),
    )
    .route("/health", web::get().to(health::health));
}

// ============================================================================
// Unit Tests
// ============================================================================
