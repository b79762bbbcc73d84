use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::SpinLedger;
use crate::{error::PersistenceError, outcome::Outcome, record::SpinRecord};

/// Volatile ledger for tests and throwaway runs.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    records: Mutex<Vec<SpinRecord>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<SpinRecord>>, PersistenceError> {
        self.records
            .lock()
            .map_err(|_| PersistenceError::Unavailable("memory ledger poisoned".into()))
    }
}

#[async_trait]
impl SpinLedger for MemoryLedger {
    async fn append(&self, record: &SpinRecord) -> Result<(), PersistenceError> {
        let mut records = self.lock()?;
        let expected = records.last().map(|r| r.spin_number).unwrap_or(0) + 1;
        if record.spin_number != expected {
            return Err(PersistenceError::OutOfSequence {
                expected,
                got: record.spin_number,
            });
        }
        records.push(record.clone());
        Ok(())
    }

    async fn last_spin_number(&self) -> Result<u64, PersistenceError> {
        Ok(self.lock()?.last().map(|r| r.spin_number).unwrap_or(0))
    }

    async fn last_spin_number_for(&self, outcome: Outcome) -> Result<u64, PersistenceError> {
        Ok(self
            .lock()?
            .iter()
            .rev()
            .find(|r| r.outcome == outcome)
            .map(|r| r.spin_number)
            .unwrap_or(0))
    }

    async fn recent(&self, limit: usize) -> Result<Vec<SpinRecord>, PersistenceError> {
        let records = self.lock()?;
        let start = records.len().saturating_sub(limit);
        Ok(records[start..].to_vec())
    }

    async fn all(&self) -> Result<Vec<SpinRecord>, PersistenceError> {
        Ok(self.lock()?.clone())
    }

    async fn count(&self) -> Result<u64, PersistenceError> {
        Ok(self.lock()?.len() as u64)
    }

    async fn reset(&self) -> Result<(), PersistenceError> {
        self.lock()?.clear();
        Ok(())
    }
}
