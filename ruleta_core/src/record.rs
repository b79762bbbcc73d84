use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::outcome::Outcome;

/// One persisted spin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinRecord {
    pub spin_number: u64,
    pub outcome: Outcome,
    pub timestamp: DateTime<Utc>,
}

impl SpinRecord {
    pub fn new(spin_number: u64, outcome: Outcome, timestamp: DateTime<Utc>) -> Self {
        Self {
            spin_number,
            outcome,
            timestamp,
        }
    }

    pub fn color(&self) -> &'static str {
        self.outcome.name()
    }
}
