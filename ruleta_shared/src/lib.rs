use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use ruleta_core::{color_table, ColorInfo, PersistenceError, SpinRecord, Statistics};
use serde::{Deserialize, Serialize};

/// A spin as it appears on the wire: `result` is the outcome code.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SpinEntry {
    pub spin_number: u64,
    pub result: u8,
    pub color: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&SpinRecord> for SpinEntry {
    fn from(r: &SpinRecord) -> Self {
        Self {
            spin_number: r.spin_number,
            result: r.outcome.code(),
            color: r.color().to_string(),
            timestamp: r.timestamp,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SpinResponse {
    pub success: bool,
    pub result: SpinEntry,
    pub statistics: Statistics,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HistoryResponse {
    pub success: bool,
    pub history: Vec<SpinEntry>,
    pub statistics: Statistics,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StatisticsResponse {
    pub success: bool,
    pub statistics: Statistics,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ResetResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ColorsResponse {
    pub success: bool,
    /// Keyed by outcome code ("1", "2", "3").
    pub colors: BTreeMap<String, ColorInfo>,
}

impl ColorsResponse {
    pub fn table() -> Self {
        Self {
            success: true,
            colors: color_table()
                .into_iter()
                .map(|(code, info)| (code.to_string(), info))
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub endpoints: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("persistence failure: {0}")]
    Persistence(#[from] PersistenceError),
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        500
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            success: false,
            error: self.to_string(),
        }
    }
}
