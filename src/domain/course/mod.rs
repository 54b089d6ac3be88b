// ============================================================================
// Course Domain
// ============================================================================

pub mod aggregate;
pub mod commands;
pub mod command_handler;

pub use aggregate::*;
pub use commands::*;
pub use command_handler::*;
