use uuid::Uuid;

// ============================================================================
// Student Domain Commands
// ============================================================================
//
// Commands carry raw caller input; the handler runs it through the value
// object factories.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentCommand {
    Enroll {
        course_id: Uuid,
        email_address: String,
        first_name: String,
        last_name: String,
    },
    EditPersonalInfo {
        student_id: Uuid,
        email_address: String,
        first_name: String,
        last_name: String,
    },
    Disenroll {
        student_id: Uuid,
        course_id: Uuid,
    },
}

impl StudentCommand {
    /// Label used in logs and metrics
    pub fn name(&self) -> &'static str {
        match self {
            StudentCommand::Enroll { .. } => "enroll_student",
            StudentCommand::EditPersonalInfo { .. } => "edit_personal_info",
            StudentCommand::Disenroll { .. } => "disenroll_student",
        }
    }
}
