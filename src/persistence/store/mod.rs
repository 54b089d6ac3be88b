// ============================================================================
// Persistence Store - Unit of Work Implementations
// ============================================================================
//
// `UnitOfWork` is the gateway contract used by command handlers.
// Two implementations: PostgreSQL (sqlx) and in-memory.
//
// ============================================================================

pub mod memory;
pub mod postgres;
pub mod soft_delete;
pub mod unit_of_work;

pub use memory::InMemoryStore;
pub use postgres::PgStore;
pub use unit_of_work::{Persistence, UnitOfWork};
