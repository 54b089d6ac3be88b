use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::persistence::core::OutboxMessage;

/// Envelope every event is wrapped in before it goes on the bus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusMessage<T> {
    pub date_occurred: DateTime<Utc>,
    pub object_id: Option<String>,
    /// Acting user, when the request carried one
    pub email: Option<String>,
    pub message: T,
}

impl BusMessage<serde_json::Value> {
    /// Wrap a drained outbox message, keeping its original timestamp
    pub fn from_outbox(outbox: &OutboxMessage) -> Result<Self, serde_json::Error> {
        Ok(Self {
            date_occurred: outbox.occurred_at,
            object_id: Some(outbox.aggregate_id.to_string()),
            email: None,
            message: serde_json::from_str(&outbox.payload)?,
        })
    }
}

/// Partition key: all events of one aggregate stay ordered
pub fn message_key(aggregate_id: Uuid) -> String {
    aggregate_id.to_string()
}
