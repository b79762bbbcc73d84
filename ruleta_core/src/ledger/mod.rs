mod memory;
mod sqlite;

use async_trait::async_trait;

use crate::{error::PersistenceError, outcome::Outcome, record::SpinRecord};

pub use memory::MemoryLedger;
pub use sqlite::SqliteLedger;

/// Append-only log of spins and the source of truth for game state.
///
/// Implementations must be `Send + Sync + 'static` so a ledger can live in
/// axum application state.
#[async_trait]
pub trait SpinLedger: Send + Sync + 'static {
    /// Durably persist one record. A failed append leaves no trace.
    async fn append(&self, record: &SpinRecord) -> Result<(), PersistenceError>;

    /// Highest spin number, 0 if empty.
    async fn last_spin_number(&self) -> Result<u64, PersistenceError>;

    /// Highest spin number with the given outcome, 0 if it never occurred.
    async fn last_spin_number_for(&self, outcome: Outcome) -> Result<u64, PersistenceError>;

    /// The most recent `limit` records, oldest first.
    async fn recent(&self, limit: usize) -> Result<Vec<SpinRecord>, PersistenceError>;

    /// Every record, oldest first.
    async fn all(&self) -> Result<Vec<SpinRecord>, PersistenceError>;

    async fn count(&self) -> Result<u64, PersistenceError>;

    /// Irreversibly destroy all records.
    async fn reset(&self) -> Result<(), PersistenceError>;
}
