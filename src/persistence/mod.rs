// ============================================================================
// Persistence Infrastructure
// ============================================================================
//
// Generic aggregate/event abstractions plus the stores that load and save
// aggregates. Domain-specific code is in src/domain/.
//
// ============================================================================

pub mod core;
mod errors;
pub mod store;

pub use errors::PersistenceError;
pub use store::{InMemoryStore, Persistence, PgStore, UnitOfWork};
