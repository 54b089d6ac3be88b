use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::persistence::core::DomainEvent;
use super::value_objects::Email;

// ============================================================================
// Student Domain Events
// ============================================================================

pub const STUDENT_EMAIL_CHANGED_TOPIC: &str = "student-email-changed";

/// Union type for all student events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum StudentEvent {
    EmailChanged(StudentEmailChanged),
}

impl DomainEvent for StudentEvent {
    fn event_type(&self) -> &'static str {
        match self {
            StudentEvent::EmailChanged(_) => "StudentEmailChanged",
        }
    }

    fn topic(&self) -> &'static str {
        match self {
            StudentEvent::EmailChanged(_) => STUDENT_EMAIL_CHANGED_TOPIC,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentEmailChanged {
    pub student_id: Uuid,
    pub new_email: Email,
}
