use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::persistence::core::{AggregateRoot, SoftDeletable};

// ============================================================================
// Course Aggregate
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    pub is_deleted: bool,
}

impl Course {
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_deleted: false,
        }
    }

    /// Soft delete: the row stays, every read skips it
    pub fn mark_deleted(&mut self) {
        self.is_deleted = true;
    }
}

/// Courses are the same course when their identities match
impl PartialEq for Course {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Course {}

impl AggregateRoot for Course {
    const AGGREGATE_TYPE: &'static str = "Course";

    fn aggregate_id(&self) -> Uuid {
        self.id
    }
}

impl SoftDeletable for Course {
    fn is_deleted(&self) -> bool {
        self.is_deleted
    }
}
