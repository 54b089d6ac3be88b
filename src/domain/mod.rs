// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// Each aggregate has its own subdirectory with its value objects, events,
// commands, errors, aggregate implementation and command handler.
// `errors` holds the outcome type shared by every command handler.
//
// ============================================================================

pub mod course;
pub mod errors;
pub mod student;

pub use errors::CommandError;
