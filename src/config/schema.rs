use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::scoring::ScoringWeights;

/// Dataset file used when neither `--data` nor the config names one.
pub const DEFAULT_DATASET: &str = "seoul_cafe_dongs.csv";

/// Leaderboard rows shown by `list` when `--top` is not given.
pub const DEFAULT_TOP: usize = 10;

/// Minimum weekday-sales share (percent) for the leaderboard filter.
pub const DEFAULT_MIN_WEEKDAY_PCT: f64 = 70.0;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Path to the neighborhood table CSV. `--data` overrides it.
    #[serde(default)]
    pub dataset: Option<PathBuf>,

    #[serde(default)]
    pub leaderboard: LeaderboardConfig,

    /// Scoring-weight overrides. Missing fields keep the built-in formula.
    #[serde(default)]
    pub weights: Option<ScoringWeights>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LeaderboardConfig {
    /// How many dongs the leaderboard shows.
    #[serde(default = "default_top")]
    pub top: usize,

    /// Weekday-sales share threshold, percent in [0, 100].
    #[serde(default = "default_min_weekday_pct")]
    pub min_weekday_pct: f64,
}

fn default_top() -> usize {
    DEFAULT_TOP
}

fn default_min_weekday_pct() -> f64 {
    DEFAULT_MIN_WEEKDAY_PCT
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            top: default_top(),
            min_weekday_pct: default_min_weekday_pct(),
        }
    }
}
