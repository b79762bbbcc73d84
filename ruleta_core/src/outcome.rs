use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Outcome {
    #[serde(rename = "azul")]
    Blue,
    #[serde(rename = "morado")]
    Purple,
    #[serde(rename = "amarillo")]
    Yellow,
}

impl Outcome {
    pub const ALL: [Outcome; 3] = [Outcome::Blue, Outcome::Purple, Outcome::Yellow];

    /// Storage code: 1 blue, 2 purple, 3 yellow.
    pub fn code(self) -> u8 {
        match self {
            Outcome::Blue => 1,
            Outcome::Purple => 2,
            Outcome::Yellow => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Outcome::Blue),
            2 => Some(Outcome::Purple),
            3 => Some(Outcome::Yellow),
            _ => None,
        }
    }

    /// Wire and storage name.
    pub fn name(self) -> &'static str {
        match self {
            Outcome::Blue => "azul",
            Outcome::Purple => "morado",
            Outcome::Yellow => "amarillo",
        }
    }

    /// Base probability in percent when no guarantee fires.
    pub fn probability(self) -> f64 {
        match self {
            Outcome::Blue => 85.4,
            Outcome::Purple => 13.0,
            Outcome::Yellow => 1.6,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColorInfo {
    pub name: String,
    pub probability: f64,
}

/// Static probability table keyed by storage code.
pub fn color_table() -> Vec<(u8, ColorInfo)> {
    Outcome::ALL
        .iter()
        .map(|o| {
            (
                o.code(),
                ColorInfo {
                    name: o.name().to_string(),
                    probability: o.probability(),
                },
            )
        })
        .collect()
}
