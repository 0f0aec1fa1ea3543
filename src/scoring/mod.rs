//! The Opportunity Index: six normalized sub-scores combined into one
//! weighted composite, ranked across the whole table.

mod config;
mod engine;
mod market;
mod table;
mod validation;

pub use config::ScoringWeights;
pub use engine::{rank_table, RawMetrics, SubScores};
pub use market::MarketChange;
pub use table::{RankedTable, ScoredDong, OFFICE_OPTIMAL_WEEKDAY_RATIO};
pub use validation::validate_weights;
