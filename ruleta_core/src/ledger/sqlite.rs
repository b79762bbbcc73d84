use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use tracing::info;

use super::SpinLedger;
use crate::{error::PersistenceError, outcome::Outcome, record::SpinRecord};

#[derive(Debug, sqlx::FromRow)]
struct SpinRow {
    spin_number: i64,
    result: i64,
    color: String,
    ts: String,
}

impl TryFrom<SpinRow> for SpinRecord {
    type Error = PersistenceError;

    fn try_from(row: SpinRow) -> Result<Self, Self::Error> {
        let corrupt = |reason: String| PersistenceError::Corrupt {
            spin_number: row.spin_number,
            reason,
        };
        let spin_number = u64::try_from(row.spin_number)
            .map_err(|_| corrupt("negative spin number".into()))?;
        let outcome = u8::try_from(row.result)
            .ok()
            .and_then(Outcome::from_code)
            .ok_or_else(|| corrupt(format!("unknown result code {}", row.result)))?;
        if row.color != outcome.name() {
            return Err(corrupt(format!(
                "color {:?} does not match result code {}",
                row.color, row.result
            )));
        }
        let timestamp = DateTime::parse_from_rfc3339(&row.ts)
            .map_err(|e| corrupt(format!("bad timestamp {:?}: {e}", row.ts)))?
            .with_timezone(&Utc);
        Ok(SpinRecord {
            spin_number,
            outcome,
            timestamp,
        })
    }
}

/// SQLite-backed ledger. Schema is defined in migrations (see migrations/ folder).
#[derive(Debug, Clone)]
pub struct SqliteLedger {
    pool: SqlitePool,
}

impl SqliteLedger {
    /// Open (creating if needed) the database at `url` and apply migrations.
    pub async fn connect(url: &str) -> Result<Self, PersistenceError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        Self::from_pool(pool).await
    }

    /// Private in-memory database. Pinned to one connection that never
    /// expires, since each SQLite memory connection is its own database.
    pub async fn in_memory() -> Result<Self, PersistenceError> {
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, PersistenceError> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl SpinLedger for SqliteLedger {
    async fn append(&self, record: &SpinRecord) -> Result<(), PersistenceError> {
        let spin_number = i64::try_from(record.spin_number).map_err(|_| {
            PersistenceError::Unavailable(format!(
                "spin number {} out of range",
                record.spin_number
            ))
        })?;
        // single-row insert; SQLite commits it atomically
        sqlx::query("INSERT INTO spins (spin_number, result, color, ts) VALUES (?, ?, ?, ?)")
            .bind(spin_number)
            .bind(record.outcome.code() as i64)
            .bind(record.outcome.name())
            .bind(record.timestamp.to_rfc3339())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn last_spin_number(&self) -> Result<u64, PersistenceError> {
        let n: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(spin_number), 0) FROM spins")
            .fetch_one(&self.pool)
            .await?;
        Ok(n.max(0) as u64)
    }

    async fn last_spin_number_for(&self, outcome: Outcome) -> Result<u64, PersistenceError> {
        let n: i64 =
            sqlx::query_scalar("SELECT COALESCE(MAX(spin_number), 0) FROM spins WHERE result = ?")
                .bind(outcome.code() as i64)
                .fetch_one(&self.pool)
                .await?;
        Ok(n.max(0) as u64)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<SpinRecord>, PersistenceError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut rows = sqlx::query_as::<_, SpinRow>(
            "SELECT spin_number, result, color, ts FROM spins ORDER BY spin_number DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        rows.reverse();
        rows.into_iter().map(SpinRecord::try_from).collect()
    }

    async fn all(&self) -> Result<Vec<SpinRecord>, PersistenceError> {
        let rows = sqlx::query_as::<_, SpinRow>(
            "SELECT spin_number, result, color, ts FROM spins ORDER BY spin_number ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(SpinRecord::try_from).collect()
    }

    async fn count(&self) -> Result<u64, PersistenceError> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM spins")
            .fetch_one(&self.pool)
            .await?;
        Ok(n.max(0) as u64)
    }

    async fn reset(&self) -> Result<(), PersistenceError> {
        let done = sqlx::query("DELETE FROM spins").execute(&self.pool).await?;
        info!(removed = done.rows_affected(), "ledger reset");
        Ok(())
    }
}
