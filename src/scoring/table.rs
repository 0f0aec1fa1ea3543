use std::collections::HashMap;

use serde::Serialize;

use super::engine::{RawMetrics, SubScores};
use crate::dataset::DongRecord;

/// Weekday-sales share at which a dong counts as office-optimal.
pub const OFFICE_OPTIMAL_WEEKDAY_RATIO: f64 = 0.80;

/// One fully scored neighborhood: the raw record, its guarded ratios, the
/// normalized sub-scores, the composite index, and the table-wide rank.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredDong {
    pub record: DongRecord,
    pub metrics: RawMetrics,
    pub scores: SubScores,
    /// Composite Opportunity Index in [0, 100].
    pub index: f64,
    /// 1-based rank; 1 is the most promising dong.
    pub rank: usize,
}

impl ScoredDong {
    /// Whether the dong clears the office-optimal badge threshold.
    pub fn is_office_optimal(&self) -> bool {
        self.metrics.weekday_ratio >= OFFICE_OPTIMAL_WEEKDAY_RATIO
    }
}

/// The annotated table: every accepted dong scored and ranked.
/// Rows are held in rank order, rank 1 first.
#[derive(Debug, Clone)]
pub struct RankedTable {
    rows: Vec<ScoredDong>,
    by_name: HashMap<String, usize>,
}

impl RankedTable {
    /// Build from rows already sorted by rank ascending.
    pub(crate) fn new(rows: Vec<ScoredDong>) -> Self {
        let by_name = rows
            .iter()
            .enumerate()
            .map(|(i, row)| (row.record.dong.clone(), i))
            .collect();
        Self { rows, by_name }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Exact-name lookup. `None` is the not-found surface; callers decide
    /// how to prompt for a re-selection.
    pub fn lookup(&self, dong: &str) -> Option<&ScoredDong> {
        self.by_name.get(dong).map(|&i| &self.rows[i])
    }

    /// Case-insensitive substring matches for a failed lookup, best rank
    /// first, at most `limit` names.
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<&str> {
        let needle = query.to_lowercase();
        self.rows
            .iter()
            .filter(|row| row.record.dong.to_lowercase().contains(&needle))
            .take(limit)
            .map(|row| row.record.dong.as_str())
            .collect()
    }

    /// The leaderboard: rows whose weekday share clears `min_weekday_ratio`,
    /// in rank order, at most `n` of them. A dong inside the global top n
    /// but below the threshold is excluded outright, not replaced by a
    /// lower-ranked one beyond position n in the filtered sequence.
    pub fn top_n(&self, n: usize, min_weekday_ratio: f64) -> Vec<&ScoredDong> {
        self.rows
            .iter()
            .filter(|row| row.metrics.weekday_ratio >= min_weekday_ratio)
            .take(n)
            .collect()
    }

    /// All rows in rank order.
    pub fn iter(&self) -> impl Iterator<Item = &ScoredDong> {
        self.rows.iter()
    }

    /// All rows in rank order as a slice; this is the export surface.
    pub fn rows(&self) -> &[ScoredDong] {
        &self.rows
    }
}
