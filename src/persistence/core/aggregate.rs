use uuid::Uuid;

use super::event::{DomainEvent, OutboxMessage};

// ============================================================================
// Aggregate Root Pattern - State-Stored Aggregates
// ============================================================================
//
// Aggregates are persisted as rows, not as event streams. Events are side
// products of state changes: they sit in an outbox list on the aggregate
// until the unit of work drains them after commit.
//
// ============================================================================

/// Anything with an identity that the unit of work can load and save
pub trait AggregateRoot: Send + Sync {
    /// Stable name used in outbox messages, e.g. "Student"
    const AGGREGATE_TYPE: &'static str;

    fn aggregate_id(&self) -> Uuid;
}

/// Records excluded from every read once marked deleted
pub trait SoftDeletable {
    fn is_deleted(&self) -> bool;
}

/// Aggregates that queue domain events
pub trait HasDomainEvents: AggregateRoot {
    type Event: DomainEvent;

    fn pending_events(&self) -> &[Self::Event];

    /// Drain the outbox list, leaving it empty
    fn take_events(&mut self) -> Vec<Self::Event>;

    /// Drain and serialize pending events for dispatch
    fn drain_outbox(&mut self) -> Result<Vec<OutboxMessage>, serde_json::Error> {
        let aggregate_id = self.aggregate_id();
        self.take_events()
            .iter()
            .map(|event| OutboxMessage::from_event(aggregate_id, Self::AGGREGATE_TYPE, event))
            .collect()
    }
}
