// ============================================================================
// Persistence Errors
// ============================================================================
//
// Infrastructure failures. Command handlers never recover from these; they
// propagate to the API boundary where they are logged and reported as a
// generic fault.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("event serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("stored row violates domain rules: {0}")]
    CorruptRow(String),

    #[error("write conflict: {0}")]
    Conflict(String),

    #[error("unit of work already committed")]
    AlreadyCommitted,

    #[error("store unavailable: {0}")]
    Unavailable(String),
}
