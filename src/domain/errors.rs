use crate::domain::student::StudentError;
use crate::persistence::PersistenceError;

// ============================================================================
// Command Outcome Errors
// ============================================================================
//
// Validation, not-found and conflict failures are expected business
// outcomes: they carry the message shown to the caller and leave state
// untouched. Persistence failures are not recovered at this layer.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("persistence failure: {0}")]
    Persistence(#[from] PersistenceError),
}

impl CommandError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// True for outcomes reported to the caller as a plain message
    pub fn is_business(&self) -> bool {
        !matches!(self, CommandError::Persistence(_))
    }

    /// Short label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            CommandError::Validation(_) => "validation",
            CommandError::NotFound(_) => "not_found",
            CommandError::Conflict(_) => "conflict",
            CommandError::Persistence(_) => "persistence",
        }
    }
}

impl From<StudentError> for CommandError {
    fn from(err: StudentError) -> Self {
        match err {
            StudentError::AlreadyEnrolled(_) | StudentError::NotEnrolled(_) => Self::Conflict(err.to_string()),
            StudentError::EmptyName | StudentError::EmptyEmail => Self::Validation(err.to_string()),
        }
    }
}
