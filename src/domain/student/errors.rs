// ============================================================================
// Student Business Rule Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueObjectError {
    #[error("Email should not be empty")]
    EmptyEmail,

    #[error("Email is too long")]
    EmailTooLong,

    #[error("Email is invalid")]
    InvalidEmail,

    #[error("First name should not be empty")]
    EmptyFirstName,

    #[error("Last name should not be empty")]
    EmptyLastName,

    #[error("First name is too long")]
    FirstNameTooLong,

    #[error("Last name is too long")]
    LastNameTooLong,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StudentError {
    #[error("Already enrolled in course '{0}'")]
    AlreadyEnrolled(String),

    #[error("Student is not enrolled in course '{0}'")]
    NotEnrolled(String),

    #[error("Name is empty")]
    EmptyName,

    #[error("Email is empty")]
    EmptyEmail,
}
