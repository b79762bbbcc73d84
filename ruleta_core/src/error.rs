/// Failures of the spin ledger's backing store.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// The database rejected or could not serve a query.
    #[error("storage backend error: {0}")]
    Backend(#[from] sqlx::Error),

    #[error("schema migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// A stored row could not be decoded into a spin record.
    #[error("corrupt spin record #{spin_number}: {reason}")]
    Corrupt { spin_number: i64, reason: String },

    /// Append of a spin number that does not follow the last one.
    #[error("spin #{got} out of sequence, expected #{expected}")]
    OutOfSequence { expected: u64, got: u64 },

    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}
