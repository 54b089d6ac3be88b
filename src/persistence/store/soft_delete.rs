use sqlx::PgPool;

use crate::domain::course::Course;
use crate::domain::student::Student;
use crate::persistence::core::{AggregateRoot, SoftDeletable};
use crate::persistence::PersistenceError;

// ============================================================================
// Soft Delete Filter
// ============================================================================
//
// Soft-deletable entities are listed here explicitly. Every gateway read
// composes `live_sql` (PostgreSQL) or `is_live` (in-memory) into its
// predicate; nothing filters implicitly.
//
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct SoftDeleteTable {
    pub entity: &'static str,
    pub table: &'static str,
}

pub const SOFT_DELETE_TABLES: &[SoftDeleteTable] = &[
    SoftDeleteTable { entity: Course::AGGREGATE_TYPE, table: "course" },
    SoftDeleteTable { entity: Student::AGGREGATE_TYPE, table: "student" },
];

/// SQL predicate selecting live rows of the table aliased `alias`
pub fn live_sql(alias: &str) -> String {
    format!("{alias}.is_deleted = FALSE")
}

pub fn is_live<T: SoftDeletable>(record: &T) -> bool {
    !record.is_deleted()
}

/// Make sure every registered table has an index backing the filter
pub async fn ensure_soft_delete_indexes(pool: &PgPool) -> Result<(), PersistenceError> {
    for entry in SOFT_DELETE_TABLES {
        let sql = format!(
            "CREATE INDEX IF NOT EXISTS ix_{table}_is_deleted ON {table} (is_deleted)",
            table = entry.table
        );
        sqlx::query(&sql).execute(pool).await?;

        tracing::debug!(entity = entry.entity, table = entry.table, "Soft delete filter registered");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_registry_covers_aggregates() {
        let entities: Vec<_> = SOFT_DELETE_TABLES.iter().map(|t| t.entity).collect();
        assert_eq!(entities, vec!["Course", "Student"]);
    }

    #[test]
    fn test_live_sql_uses_alias() {
        assert_eq!(live_sql("c"), "c.is_deleted = FALSE");
    }

    #[test]
    fn test_is_live() {
        let mut course = Course::new(Uuid::new_v4(), "History");
        assert!(is_live(&course));
        course.mark_deleted();
        assert!(!is_live(&course));
    }
}
