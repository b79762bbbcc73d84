use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::{
    error::PersistenceError,
    ledger::SpinLedger,
    outcome::Outcome,
    record::SpinRecord,
    rng::RandomSource,
    selector::{select_next_traced, GameState},
    stats::{self, Statistics, STATS_WINDOW},
};

struct Inner {
    state: GameState,
    rng: Box<dyn RandomSource>,
    /// Timestamp of the newest record; new records never precede it.
    last_timestamp: Option<DateTime<Utc>>,
}

/// The single game instance: ledger plus the in-memory guarantee trackers.
///
/// Every spin and reset runs under one async mutex, so selection and append
/// happen as a unit and spin numbers stay contiguous under concurrent load.
pub struct Game<L: SpinLedger> {
    ledger: L,
    inner: Mutex<Inner>,
}

impl<L: SpinLedger> Game<L> {
    /// Build a game over `ledger` and load its state from it.
    pub async fn open(ledger: L, rng: Box<dyn RandomSource>) -> Result<Self, PersistenceError> {
        let game = Self {
            ledger,
            inner: Mutex::new(Inner {
                state: GameState::default(),
                rng,
                last_timestamp: None,
            }),
        };
        game.rehydrate().await?;
        Ok(game)
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Rebuild the trackers from the ledger, discarding in-memory state.
    pub async fn rehydrate(&self) -> Result<GameState, PersistenceError> {
        let mut inner = self.inner.lock().await;
        self.rehydrate_locked(&mut inner).await
    }

    async fn rehydrate_locked(&self, inner: &mut Inner) -> Result<GameState, PersistenceError> {
        let state = GameState {
            spin_count: self.ledger.last_spin_number().await?,
            last_purple_spin: self.ledger.last_spin_number_for(Outcome::Purple).await?,
            last_yellow_spin: self.ledger.last_spin_number_for(Outcome::Yellow).await?,
        };
        let last_timestamp = self.ledger.recent(1).await?.pop().map(|r| r.timestamp);
        inner.state = state;
        inner.last_timestamp = last_timestamp;
        info!(
            spin_count = state.spin_count,
            last_purple = state.last_purple_spin,
            last_yellow = state.last_yellow_spin,
            "game state rehydrated"
        );
        Ok(state)
    }

    /// Reload from the ledger when it moved without us: an append whose
    /// caller was cancelled after the row committed, or a reset made through
    /// another handle on the same database.
    async fn sync_locked(&self, inner: &mut Inner) -> Result<(), PersistenceError> {
        let last = self.ledger.last_spin_number().await?;
        if last != inner.state.spin_count {
            warn!(
                ledger = last,
                memory = inner.state.spin_count,
                "ledger diverged from game state"
            );
            self.rehydrate_locked(inner).await?;
        }
        Ok(())
    }

    pub async fn state(&self) -> GameState {
        self.inner.lock().await.state
    }

    /// Run one spin. The new state is committed only after the ledger
    /// accepted the record; if the caller is dropped mid-append, the next
    /// locked operation resyncs from the ledger.
    pub async fn spin(&self) -> Result<SpinRecord, PersistenceError> {
        let mut inner = self.inner.lock().await;
        self.spin_locked(&mut inner).await
    }

    async fn spin_locked(&self, inner: &mut Inner) -> Result<SpinRecord, PersistenceError> {
        self.sync_locked(inner).await?;
        let current = inner.state;
        let (outcome, next, trigger) = select_next_traced(&current, inner.rng.as_mut());

        let now = Utc::now();
        let timestamp = match inner.last_timestamp {
            Some(prev) if prev > now => prev,
            _ => now,
        };
        let record = SpinRecord::new(next.spin_count, outcome, timestamp);

        if let Err(e) = self.ledger.append(&record).await {
            error!(spin_number = record.spin_number, error = %e, "failed to persist spin");
            return Err(e);
        }
        inner.state = next;
        inner.last_timestamp = Some(timestamp);
        debug!(spin_number = record.spin_number, %outcome, ?trigger, "spin recorded");
        Ok(record)
    }

    /// Up to `limit` (at most 100) most recent records, oldest first.
    pub async fn history(&self, limit: usize) -> Result<Vec<SpinRecord>, PersistenceError> {
        self.ledger.recent(limit.min(STATS_WINDOW)).await
    }

    pub async fn statistics(&self) -> Result<Statistics, PersistenceError> {
        let mut inner = self.inner.lock().await;
        self.sync_locked(&mut inner).await?;
        stats::compute(&self.ledger, &inner.state).await
    }

    /// Spin and compute statistics from the same locked view.
    pub async fn spin_with_statistics(&self) -> Result<(SpinRecord, Statistics), PersistenceError> {
        let mut inner = self.inner.lock().await;
        let record = self.spin_locked(&mut inner).await?;
        let stats = stats::compute(&self.ledger, &inner.state).await?;
        Ok((record, stats))
    }

    /// History and statistics from one consistent view.
    pub async fn history_with_statistics(
        &self,
    ) -> Result<(Vec<SpinRecord>, Statistics), PersistenceError> {
        let mut inner = self.inner.lock().await;
        self.sync_locked(&mut inner).await?;
        let history = self.ledger.recent(STATS_WINDOW).await?;
        let total = self.ledger.count().await?;
        let stats = stats::summarize(total, &history, &inner.state);
        Ok((history, stats))
    }

    /// Destroy the ledger and zero the trackers.
    pub async fn reset(&self) -> Result<(), PersistenceError> {
        let mut inner = self.inner.lock().await;
        self.ledger.reset().await?;
        inner.state = GameState::default();
        inner.last_timestamp = None;
        info!("game reset");
        Ok(())
    }
}
