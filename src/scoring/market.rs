use std::fmt;

use serde::{Deserialize, Serialize};

/// Market-change level of a dong on the fixed four-step scale used by the
/// Seoul commercial-district dataset. Ordered worst to best; anything outside
/// 1..=4 is invalid input and never clamped to a mid-scale value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MarketChange {
    /// Shrinking trade area (level 1).
    Contraction,
    /// Flat trade area (level 2).
    Stagnation,
    /// Growing trade area (level 3).
    Expansion,
    /// High-churn, fast-growing trade area (level 4).
    Dynamic,
}

impl MarketChange {
    /// Numeric level on the 1..=4 scale.
    pub fn level(self) -> u8 {
        match self {
            MarketChange::Contraction => 1,
            MarketChange::Stagnation => 2,
            MarketChange::Expansion => 3,
            MarketChange::Dynamic => 4,
        }
    }

    /// Sub-score contribution: the level mapped onto {25, 50, 75, 100}.
    pub fn score(self) -> f64 {
        f64::from(self.level()) * 100.0 / 4.0
    }
}

impl TryFrom<u8> for MarketChange {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(MarketChange::Contraction),
            2 => Ok(MarketChange::Stagnation),
            3 => Ok(MarketChange::Expansion),
            4 => Ok(MarketChange::Dynamic),
            other => Err(format!("market_change must be 1-4, got {}", other)),
        }
    }
}

impl From<MarketChange> for u8 {
    fn from(m: MarketChange) -> u8 {
        m.level()
    }
}

impl fmt::Display for MarketChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketChange::Contraction => write!(f, "Contraction"),
            MarketChange::Stagnation => write!(f, "Stagnation"),
            MarketChange::Expansion => write!(f, "Expansion"),
            MarketChange::Dynamic => write!(f, "Dynamic"),
        }
    }
}
