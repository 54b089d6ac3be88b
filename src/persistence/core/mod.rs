// ============================================================================
// Persistence Core - Generic Aggregate & Event Abstractions
// ============================================================================
//
// No domain-specific code lives here: Student and Course implement these
// traits from src/domain/.
//
// ============================================================================

pub mod aggregate;
pub mod event;

pub use aggregate::{AggregateRoot, HasDomainEvents, SoftDeletable};
pub use event::{DomainEvent, OutboxMessage};
