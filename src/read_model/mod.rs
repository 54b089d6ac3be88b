// ============================================================================
// Read Model - Query Side
// ============================================================================
//
// Queries bypass the aggregates and the unit of work. Every query composes
// the soft delete filter: deleted students and courses are never listed,
// and enrollments pointing at deleted courses are left out.
//
// ============================================================================

mod memory;
mod postgres;
pub mod views;

use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use crate::persistence::PersistenceError;

pub use views::{CourseView, EnrollmentView, StudentView};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentFilter {
    /// Exact email match
    pub email: Option<String>,
    /// Only students with a live enrollment in this course
    pub course_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseFilter {
    /// Case-insensitive substring of the course name
    pub name_contains: Option<String>,
}

/// Students are ordered by last name, first name; courses by name.
#[async_trait]
pub trait ReadModel: Send + Sync {
    async fn list_students(&self, filter: &StudentFilter) -> Result<Vec<StudentView>, PersistenceError>;

    async fn list_courses(&self, filter: &CourseFilter) -> Result<Vec<CourseView>, PersistenceError>;
}
