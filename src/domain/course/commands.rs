use uuid::Uuid;

// ============================================================================
// Course Domain Commands
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseCommand {
    Register { name: String },
    /// Soft delete
    Remove { course_id: Uuid },
}

impl CourseCommand {
    pub fn name(&self) -> &'static str {
        match self {
            CourseCommand::Register { .. } => "register_new_course",
            CourseCommand::Remove { .. } => "remove_course",
        }
    }
}
