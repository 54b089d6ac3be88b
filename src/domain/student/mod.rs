// ============================================================================
// Student Domain - Business Logic for the Student Aggregate
// ============================================================================
//
// - Value objects (Email, Name)
// - Events (StudentEmailChanged)
// - Commands (Enroll, EditPersonalInfo, Disenroll)
// - Errors (ValueObjectError, StudentError)
// - Aggregate (Student, owning its Enrollments)
// - Command Handler (StudentCommandHandler)
//
// ============================================================================

pub mod value_objects;
pub mod events;
pub mod commands;
pub mod errors;
pub mod aggregate;
pub mod command_handler;

// Re-export for convenience
pub use value_objects::*;
pub use events::*;
pub use commands::*;
pub use errors::*;
pub use aggregate::*;
pub use command_handler::*;
