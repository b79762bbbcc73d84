use serde::{Deserialize, Serialize};

use crate::{
    error::PersistenceError, ledger::SpinLedger, outcome::Outcome, record::SpinRecord,
    selector::GameState,
};

/// Size of the recent window the percentages are computed over.
pub const STATS_WINDOW: usize = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorTally<T> {
    #[serde(rename = "azul")]
    pub blue: T,
    #[serde(rename = "morado")]
    pub purple: T,
    #[serde(rename = "amarillo")]
    pub yellow: T,
}

impl<T: Copy> ColorTally<T> {
    pub fn get(&self, outcome: Outcome) -> T {
        match outcome {
            Outcome::Blue => self.blue,
            Outcome::Purple => self.purple,
            Outcome::Yellow => self.yellow,
        }
    }

    fn slot(&mut self, outcome: Outcome) -> &mut T {
        match outcome {
            Outcome::Blue => &mut self.blue,
            Outcome::Purple => &mut self.purple,
            Outcome::Yellow => &mut self.yellow,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// All-time count from the ledger.
    pub total_spins: u64,
    /// Records in the recent window.
    pub results_shown: u64,
    pub color_counts: ColorTally<u64>,
    pub percentages: ColorTally<f64>,
    pub spins_since_last_purple: u64,
    pub spins_since_last_yellow: u64,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Window math, separated from the ledger reads.
pub fn summarize(total_spins: u64, window: &[SpinRecord], state: &GameState) -> Statistics {
    let mut color_counts = ColorTally::<u64>::default();
    for record in window {
        *color_counts.slot(record.outcome) += 1;
    }

    let shown = window.len() as u64;
    let mut percentages = ColorTally::<f64>::default();
    if shown > 0 {
        for o in Outcome::ALL {
            *percentages.slot(o) = round2(color_counts.get(o) as f64 / shown as f64 * 100.0);
        }
    }

    Statistics {
        total_spins,
        results_shown: shown,
        color_counts,
        percentages,
        spins_since_last_purple: state.spins_since_last_purple(),
        spins_since_last_yellow: state.spins_since_last_yellow(),
    }
}

pub async fn compute<L>(ledger: &L, state: &GameState) -> Result<Statistics, PersistenceError>
where
    L: SpinLedger + ?Sized,
{
    let total = ledger.count().await?;
    let window = ledger.recent(STATS_WINDOW).await?;
    Ok(summarize(total, &window, state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn records(outcomes: &[Outcome]) -> Vec<SpinRecord> {
        outcomes
            .iter()
            .enumerate()
            .map(|(i, o)| SpinRecord::new(i as u64 + 1, *o, Utc::now()))
            .collect()
    }

    #[test]
    fn empty_window_is_all_zero() {
        let stats = summarize(0, &[], &GameState::default());
        assert_eq!(stats.total_spins, 0);
        assert_eq!(stats.results_shown, 0);
        assert_eq!(stats.color_counts, ColorTally::default());
        assert_eq!(stats.percentages, ColorTally::default());
        assert_eq!(stats.spins_since_last_purple, 0);
        assert_eq!(stats.spins_since_last_yellow, 0);
    }

    #[test]
    fn percentages_rounded_to_two_places() {
        let window = records(&[Outcome::Blue, Outcome::Blue, Outcome::Purple]);
        let stats = summarize(3, &window, &GameState::default());
        assert_eq!(stats.color_counts.blue, 2);
        assert_eq!(stats.color_counts.purple, 1);
        assert_eq!(stats.percentages.blue, 66.67);
        assert_eq!(stats.percentages.purple, 33.33);
        assert_eq!(stats.percentages.yellow, 0.0);
    }

    #[test]
    fn percentages_sum_to_hundred() {
        let mut outcomes = Vec::new();
        for i in 0..97 {
            outcomes.push(match i % 7 {
                0 => Outcome::Purple,
                3 => Outcome::Yellow,
                _ => Outcome::Blue,
            });
        }
        let stats = summarize(500, &records(&outcomes), &GameState::default());
        let p = stats.percentages;
        let sum = p.blue + p.purple + p.yellow;
        assert!((sum - 100.0).abs() <= 0.02, "sum was {sum}");
        assert_eq!(stats.total_spins, 500);
        assert_eq!(stats.results_shown, 97);
    }

    #[test]
    fn json_keys_use_color_names() {
        let window = records(&[Outcome::Blue, Outcome::Yellow]);
        let stats = summarize(2, &window, &GameState::default());
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["color_counts"]["azul"], 1);
        assert_eq!(json["color_counts"]["morado"], 0);
        assert_eq!(json["color_counts"]["amarillo"], 1);
        assert_eq!(json["percentages"]["azul"], 50.0);
        assert!(json["color_counts"].get("blue").is_none());
    }

    #[test]
    fn gauges_come_from_state() {
        let state = GameState {
            spin_count: 15,
            last_purple_spin: 10,
            last_yellow_spin: 0,
        };
        let stats = summarize(15, &[], &state);
        assert_eq!(stats.spins_since_last_purple, 5);
        assert_eq!(stats.spins_since_last_yellow, 15);
    }
}
