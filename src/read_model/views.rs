use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::course::Course;
use crate::domain::student::{Enrollment, Student};

// ============================================================================
// Query Views
// ============================================================================
//
// Flat, serializable shapes returned by the read side. They never carry
// soft-deleted rows.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseView {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentView {
    pub id: Uuid,
    pub course_id: Uuid,
    pub course_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentView {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub enrollments: Vec<EnrollmentView>,
}

impl From<&Course> for CourseView {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id,
            name: course.name.clone(),
        }
    }
}

impl From<&Enrollment> for EnrollmentView {
    fn from(enrollment: &Enrollment) -> Self {
        Self {
            id: enrollment.id(),
            course_id: enrollment.course().id,
            course_name: enrollment.course().name.clone(),
        }
    }
}

impl From<&Student> for StudentView {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id(),
            first_name: student.name().first_name().to_string(),
            last_name: student.name().last_name().to_string(),
            email: student.email().as_str().to_string(),
            enrollments: student.enrollments().iter().map(EnrollmentView::from).collect(),
        }
    }
}
