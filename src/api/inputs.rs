use serde::Deserialize;
use uuid::Uuid;

use crate::domain::course::CourseCommand;
use crate::domain::student::StudentCommand;

// ============================================================================
// Request Bodies
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct EnrollStudentInput {
    pub course_id: Uuid,
    pub email_address: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<EnrollStudentInput> for StudentCommand {
    fn from(input: EnrollStudentInput) -> Self {
        StudentCommand::Enroll {
            course_id: input.course_id,
            email_address: input.email_address,
            first_name: input.first_name,
            last_name: input.last_name,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterNewCourseInput {
    pub name: String,
}

impl From<RegisterNewCourseInput> for CourseCommand {
    fn from(input: RegisterNewCourseInput) -> Self {
        CourseCommand::Register { name: input.name }
    }
}

/// Student id comes from the path
#[derive(Debug, Clone, Deserialize)]
pub struct EditPersonalInfoInput {
    pub email_address: String,
    pub first_name: String,
    pub last_name: String,
}

impl EditPersonalInfoInput {
    pub fn into_command(self, student_id: Uuid) -> StudentCommand {
        StudentCommand::EditPersonalInfo {
            student_id,
            email_address: self.email_address,
            first_name: self.first_name,
            last_name: self.last_name,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisenrollInput {
    pub course_id: Uuid,
}
