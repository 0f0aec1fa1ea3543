use serde::{Deserialize, Serialize};

/// Weights for the six sub-scores that make up the Opportunity Index.
///
/// Each weight multiplies a sub-score in [0, 100], so with weights summing to
/// 1.0 the composite index stays in [0, 100] as well. The defaults follow the
/// dashboard formula: opportunity 30%, peak-window 20%, weekday 20%, market
/// state 10%, low-price share 10%, competition 10%.
///
/// Example YAML (all fields optional, missing ones keep their default):
/// ```yaml
/// weights:
///   opportunity: 0.30
///   peak: 0.20
///   weekday: 0.20
///   market: 0.10
///   low_price: 0.10
///   competition: 0.10
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringWeights {
    /// Demand per low-price competitor (employees per low-price cafe).
    #[serde(default = "default_opportunity")]
    pub opportunity: f64,

    /// Share of sales in the 06:00-14:00 office-commute window.
    #[serde(default = "default_peak")]
    pub peak: f64,

    /// Share of sales made on weekdays.
    #[serde(default = "default_weekday")]
    pub weekday: f64,

    /// Market-change level on the four-step scale.
    #[serde(default = "default_market")]
    pub market: f64,

    /// Low-price share of all cafes, inverted (fewer low-price rivals wins).
    #[serde(default = "default_low_price")]
    pub low_price: f64,

    /// Cafes per employee, inverted (less supply per head wins).
    #[serde(default = "default_competition")]
    pub competition: f64,
}

fn default_opportunity() -> f64 {
    0.30
}

fn default_peak() -> f64 {
    0.20
}

fn default_weekday() -> f64 {
    0.20
}

fn default_market() -> f64 {
    0.10
}

fn default_low_price() -> f64 {
    0.10
}

fn default_competition() -> f64 {
    0.10
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            opportunity: default_opportunity(),
            peak: default_peak(),
            weekday: default_weekday(),
            market: default_market(),
            low_price: default_low_price(),
            competition: default_competition(),
        }
    }
}

impl ScoringWeights {
    /// Sum of all six weights. Valid configurations sum to 1.0.
    pub fn sum(&self) -> f64 {
        self.opportunity + self.peak + self.weekday + self.market + self.low_price + self.competition
    }
}
