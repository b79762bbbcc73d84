pub mod error;
pub mod game;
pub mod ledger;
pub mod outcome;
pub mod record;
pub mod rng;
pub mod selector;
pub mod stats;

pub use crate::error::PersistenceError;
pub use crate::game::Game;
pub use crate::ledger::{MemoryLedger, SpinLedger, SqliteLedger};
pub use crate::outcome::{color_table, ColorInfo, Outcome};
pub use crate::record::SpinRecord;
pub use crate::rng::{derive_hash_hex, EntropySource, RandomSource, SeededSource};
pub use crate::selector::{outcome_for_draw, select_next, select_next_traced, GameState, Trigger};
pub use crate::stats::{compute, summarize, ColorTally, Statistics, STATS_WINDOW};
