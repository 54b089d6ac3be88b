use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

// ============================================================================
// Domain Events & Outbox Messages
// ============================================================================
//
// Aggregates queue typed domain events. After a successful commit the unit
// of work drains them and turns each one into an `OutboxMessage`, the
// type-erased form handed to dispatchers.
//
// ============================================================================

/// Generic Domain Event trait
///
/// Every event names its type and the topic it is published to.
pub trait DomainEvent: Serialize + Clone + std::fmt::Debug + Send + Sync {
    fn event_type(&self) -> &'static str;
    fn topic(&self) -> &'static str;
}

/// A drained domain event ready for dispatch
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OutboxMessage {
    pub event_id: Uuid,
    pub aggregate_id: Uuid,
    pub aggregate_type: String,
    pub event_type: String,
    pub topic: String,
    pub payload: String,
    pub occurred_at: DateTime<Utc>,
}

impl OutboxMessage {
    pub fn from_event<E: DomainEvent>(
        aggregate_id: Uuid,
        aggregate_type: &str,
        event: &E,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            event_id: Uuid::now_v7(),
            aggregate_id,
            aggregate_type: aggregate_type.to_string(),
            event_type: event.event_type().to_string(),
            topic: event.topic().to_string(),
            payload: serialize_event(event)?,
            occurred_at: Utc::now(),
        })
    }

    /// Decode the payload back into its typed event.
    pub fn decode<E: for<'de> Deserialize<'de>>(&self) -> Result<E, serde_json::Error> {
        serde_json::from_str(&self.payload)
    }
}

pub fn serialize_event<E: Serialize>(event: &E) -> Result<String, serde_json::Error> {
    serde_json::to_string(event)
}

// ============================================================================
// Tests
// ============================================================================
