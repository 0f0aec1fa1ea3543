use anyhow::{bail, Result};
use serde::Serialize;

use super::config::ScoringWeights;
use super::table::{RankedTable, ScoredDong};
use super::validation::validate_weights;
use crate::dataset::DongRecord;

/// Guard for monetary denominators. Count denominators floor at one store
/// instead, so a zero-competitor dong stays on the table's scale rather than
/// exploding to an epsilon-sized quotient.
const MONEY_EPSILON: f64 = 1e-9;

/// Per-row ratios computed before any table-relative normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RawMetrics {
    /// Employees per low-price cafe; the demand-per-competitor ratio.
    pub opportunity_raw: f64,
    /// Low-price cafes as a fraction of all cafes, in [0, 1].
    pub low_price_share: f64,
    /// Share of sales inside the 06:00-14:00 window, in [0, 1].
    pub peak_ratio: f64,
    /// Weekday share of weekday plus weekend sales, in [0, 1].
    pub weekday_ratio: f64,
    /// Cafes per employee; lower means less supply chasing the same demand.
    pub competition_intensity: f64,
}

impl RawMetrics {
    /// Compute the guarded ratios for one record.
    ///
    /// Guard policy: count denominators floor at 1; monetary denominators
    /// use a small epsilon and the resulting share is clamped into [0, 1].
    /// Every field is finite for every validated record.
    pub fn from_record(record: &DongRecord) -> Self {
        let opportunity_raw = record.employees / record.low_price_cafes.max(1.0);
        let low_price_share =
            (record.low_price_cafes / record.total_cafes.max(1.0)).clamp(0.0, 1.0);
        let peak_ratio =
            (record.peak_sales / record.total_sales.max(MONEY_EPSILON)).clamp(0.0, 1.0);
        let week_total = record.weekday_sales + record.weekend_sales;
        let weekday_ratio =
            (record.weekday_sales / week_total.max(MONEY_EPSILON)).clamp(0.0, 1.0);
        let competition_intensity = record.total_cafes / record.employees.max(1.0);

        Self {
            opportunity_raw,
            low_price_share,
            peak_ratio,
            weekday_ratio,
            competition_intensity,
        }
    }
}

/// The six normalized sub-scores, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubScores {
    pub opportunity: f64,
    pub low_price: f64,
    pub peak: f64,
    pub weekday: f64,
    pub market: f64,
    pub competition: f64,
}

impl SubScores {
    /// Weighted composite of the six sub-scores. With weights summing to
    /// 1.0 the result stays in [0, 100].
    pub fn composite(&self, weights: &ScoringWeights) -> f64 {
        weights.opportunity * self.opportunity
            + weights.peak * self.peak
            + weights.weekday * self.weekday
            + weights.market * self.market
            + weights.low_price * self.low_price
            + weights.competition * self.competition
    }
}

/// Score and rank the whole table in one batch.
///
/// Two passes: guarded per-row ratios first, then normalization against the
/// table extrema. Normalization is table-relative, so adding or removing a
/// row changes every sub-score on the next run. Pure function of its inputs;
/// rerunning on the same table reproduces ranks and indices bit for bit.
pub fn rank_table(records: &[DongRecord], weights: &ScoringWeights) -> Result<RankedTable> {
    if records.is_empty() {
        bail!("dataset has no neighborhoods to analyze");
    }
    if let Err(errors) = validate_weights(weights) {
        bail!("invalid scoring weights: {}", errors.join("; "));
    }

    // Pass 1: per-row ratios.
    let metrics: Vec<RawMetrics> = records.iter().map(RawMetrics::from_record).collect();

    // Pass 2: table extrema, then normalized scores and the composite.
    let max_opportunity = metrics
        .iter()
        .map(|m| m.opportunity_raw)
        .fold(0.0, f64::max);
    let max_competition = metrics
        .iter()
        .map(|m| m.competition_intensity)
        .fold(0.0, f64::max);

    let mut rows: Vec<ScoredDong> = records
        .iter()
        .zip(metrics)
        .map(|(record, metrics)| {
            let scores = SubScores {
                opportunity: ratio_to_max(metrics.opportunity_raw, max_opportunity),
                low_price: 100.0 * (1.0 - metrics.low_price_share),
                peak: 100.0 * metrics.peak_ratio,
                weekday: 100.0 * metrics.weekday_ratio,
                market: record.market_change.score(),
                competition: inverted_ratio_to_max(
                    metrics.competition_intensity,
                    max_competition,
                ),
            };
            let index = scores.composite(weights);
            ScoredDong {
                record: record.clone(),
                metrics,
                scores,
                index,
                rank: 0,
            }
        })
        .collect();

    // Stable sort: equal indices keep input order, so ties break the same
    // way on every run.
    rows.sort_by(|a, b| {
        b.index
            .partial_cmp(&a.index)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i + 1;
    }

    Ok(RankedTable::new(rows))
}

/// Normalize a ratio against the table maximum onto [0, 100].
/// A zero maximum means every row scored zero.
fn ratio_to_max(value: f64, max: f64) -> f64 {
    if max > 0.0 {
        100.0 * value / max
    } else {
        0.0
    }
}

/// Inverted ratio-to-max: the lowest raw value scores 100. A zero maximum
/// means zero supply everywhere, which is the best case for every row.
fn inverted_ratio_to_max(value: f64, max: f64) -> f64 {
    if max > 0.0 {
        100.0 - 100.0 * value / max
    } else {
        100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::MarketChange;

    #[allow(clippy::too_many_arguments)]
    fn dong(
        name: &str,
        employees: f64,
        low_price_cafes: f64,
        total_cafes: f64,
        weekday_sales: f64,
        weekend_sales: f64,
        peak_sales: f64,
        total_sales: f64,
        market: u8,
    ) -> DongRecord {
        DongRecord {
            dong: name.to_string(),
            employees,
            low_price_cafes,
            total_cafes,
            weekday_sales,
            weekend_sales,
            peak_sales,
            total_sales,
            market_change: MarketChange::try_from(market).unwrap(),
            sales_00_06: 0.0,
            sales_06_11: 0.0,
            sales_11_14: 0.0,
            sales_14_17: 0.0,
            sales_17_21: 0.0,
            sales_21_24: 0.0,
            sales_mon: 0.0,
            sales_tue: 0.0,
            sales_wed: 0.0,
            sales_thu: 0.0,
            sales_fri: 0.0,
            sales_sat: 0.0,
            sales_sun: 0.0,
            traffic_age_10: 0.0,
            traffic_age_20: 0.0,
            traffic_age_30: 0.0,
            traffic_age_40: 0.0,
            traffic_age_50: 0.0,
            traffic_age_60_plus: 0.0,
            traffic_male: 0.0,
            traffic_female: 0.0,
            open_rate: 0.0,
            close_rate: 0.0,
            avg_open_months: 0.0,
            avg_close_months: 0.0,
        }
    }

    /// The three-neighborhood scenario exercised throughout: A is a strong
    /// office dong, B a weekend-leaning one, C small but focused.
    fn abc_records() -> Vec<DongRecord> {
        vec![
            dong("A-dong", 1000.0, 10.0, 50.0, 800.0, 200.0, 400.0, 1000.0, 4),
            dong("B-dong", 500.0, 20.0, 60.0, 600.0, 400.0, 200.0, 1000.0, 2),
            dong("C-dong", 200.0, 5.0, 10.0, 900.0, 100.0, 500.0, 1000.0, 3),
        ]
    }

    #[test]
    fn test_raw_metrics_for_plain_row() {
        let record = dong("X", 1000.0, 10.0, 50.0, 800.0, 200.0, 400.0, 1000.0, 4);
        let m = RawMetrics::from_record(&record);
        assert_eq!(m.opportunity_raw, 100.0);
        assert_eq!(m.low_price_share, 0.2);
        assert_eq!(m.peak_ratio, 0.4);
        assert_eq!(m.weekday_ratio, 0.8);
        assert_eq!(m.competition_intensity, 0.05);
    }

    #[test]
    fn test_zero_low_price_cafes_floors_at_one() {
        let record = dong("X", 1000.0, 0.0, 50.0, 800.0, 200.0, 400.0, 1000.0, 4);
        let m = RawMetrics::from_record(&record);
        assert_eq!(m.opportunity_raw, 1000.0);
        assert!(m.opportunity_raw.is_finite());
    }

    #[test]
    fn test_zero_total_cafes_stays_finite() {
        let record = dong("X", 1000.0, 0.0, 0.0, 800.0, 200.0, 400.0, 1000.0, 4);
        let m = RawMetrics::from_record(&record);
        assert!(m.low_price_share.is_finite());
        assert_eq!(m.low_price_share, 0.0);
        assert!(m.competition_intensity.is_finite());
        assert_eq!(m.competition_intensity, 0.0);
    }

    #[test]
    fn test_zero_sales_ratios_are_zero_not_nan() {
        let record = dong("X", 1000.0, 10.0, 50.0, 0.0, 0.0, 0.0, 0.0, 2);
        let m = RawMetrics::from_record(&record);
        assert_eq!(m.peak_ratio, 0.0);
        assert_eq!(m.weekday_ratio, 0.0);
    }

    #[test]
    fn test_inconsistent_peak_clamped_to_one() {
        // Upstream aggregation quirk: peak window exceeding the monthly
        // total clamps instead of breaking the [0, 100] score bound.
        let record = dong("X", 1000.0, 10.0, 50.0, 800.0, 200.0, 1500.0, 1000.0, 2);
        let m = RawMetrics::from_record(&record);
        assert_eq!(m.peak_ratio, 1.0);
    }

    #[test]
    fn test_composite_hand_computed() {
        let records = vec![
            dong("X", 1000.0, 10.0, 50.0, 800.0, 200.0, 400.0, 1000.0, 4),
            dong("Y", 500.0, 20.0, 60.0, 600.0, 400.0, 200.0, 1000.0, 2),
        ];
        let table = rank_table(&records, &ScoringWeights::default()).unwrap();

        // X: opp 100, peak 40, weekday 80, market 100, low-price 80,
        //    competition 100 - 100*(0.05/0.12) = 175/3.
        // index = 30 + 8 + 16 + 10 + 8 + 17.5/3 = 467/6.
        let x = table.lookup("X").unwrap();
        assert!((x.index - 467.0 / 6.0).abs() < 1e-9);

        // Y: opp 25, peak 20, weekday 60, market 50, low-price 200/3,
        //    competition 0. index = 7.5 + 4 + 12 + 5 + 20/3 + 0.
        let y = table.lookup("Y").unwrap();
        assert!((y.index - (28.5 + 20.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_scenario_order_a_c_b() {
        let table = rank_table(&abc_records(), &ScoringWeights::default()).unwrap();
        assert_eq!(table.lookup("A-dong").unwrap().rank, 1);
        assert_eq!(table.lookup("C-dong").unwrap().rank, 2);
        assert_eq!(table.lookup("B-dong").unwrap().rank, 3);
    }

    #[test]
    fn test_determinism_bit_identical() {
        let records = abc_records();
        let weights = ScoringWeights::default();
        let first = rank_table(&records, &weights).unwrap();
        let second = rank_table(&records, &weights).unwrap();
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.record.dong, b.record.dong);
            assert_eq!(a.rank, b.rank);
            assert_eq!(a.index.to_bits(), b.index.to_bits());
            assert_eq!(a.scores, b.scores);
        }
    }

    #[test]
    fn test_rank_bijection() {
        let records: Vec<DongRecord> = (0..25)
            .map(|i| {
                dong(
                    &format!("Dong-{i}"),
                    1000.0 + 37.0 * i as f64,
                    5.0 + (i % 7) as f64,
                    40.0 + (i % 11) as f64,
                    800.0,
                    200.0 + 10.0 * i as f64,
                    400.0,
                    1000.0 + 10.0 * i as f64,
                    (i % 4 + 1) as u8,
                )
            })
            .collect();
        let table = rank_table(&records, &ScoringWeights::default()).unwrap();

        let mut ranks: Vec<usize> = table.iter().map(|row| row.rank).collect();
        ranks.sort_unstable();
        let expected: Vec<usize> = (1..=records.len()).collect();
        assert_eq!(ranks, expected);
    }

    #[test]
    fn test_ties_keep_input_order() {
        // Identical metrics means identical indices; the stable sort must
        // leave the earlier input row ranked higher.
        let records = vec![
            dong("First-dong", 1000.0, 10.0, 50.0, 800.0, 200.0, 400.0, 1000.0, 3),
            dong("Second-dong", 1000.0, 10.0, 50.0, 800.0, 200.0, 400.0, 1000.0, 3),
        ];
        let table = rank_table(&records, &ScoringWeights::default()).unwrap();
        assert_eq!(table.lookup("First-dong").unwrap().rank, 1);
        assert_eq!(table.lookup("Second-dong").unwrap().rank, 2);
        assert_eq!(
            table.lookup("First-dong").unwrap().index,
            table.lookup("Second-dong").unwrap().index
        );
    }

    #[test]
    fn test_all_scores_within_bounds() {
        let mut records = abc_records();
        // Edge rows: no competitors, no sales, no employees.
        records.push(dong("Empty-dong", 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1));
        records.push(dong(
            "Crowded-dong",
            50.0,
            300.0,
            400.0,
            100.0,
            900.0,
            50.0,
            1000.0,
            1,
        ));
        let table = rank_table(&records, &ScoringWeights::default()).unwrap();

        for row in table.iter() {
            for score in [
                row.scores.opportunity,
                row.scores.low_price,
                row.scores.peak,
                row.scores.weekday,
                row.scores.market,
                row.scores.competition,
            ] {
                assert!(
                    (0.0..=100.0).contains(&score),
                    "{}: sub-score {} out of bounds",
                    row.record.dong,
                    score
                );
            }
            assert!(
                (0.0..=100.0).contains(&row.index),
                "{}: index {} out of bounds",
                row.record.dong,
                row.index
            );
        }
    }

    #[test]
    fn test_more_demand_never_lowers_index() {
        let records = abc_records();
        let weights = ScoringWeights::default();
        let before = rank_table(&records, &weights)
            .unwrap()
            .lookup("C-dong")
            .unwrap()
            .index;

        // Raising C's employee count raises its opportunity ratio and only
        // helps its competition score; the index cannot drop.
        let mut boosted = records;
        boosted[2].employees *= 3.0;
        let after = rank_table(&boosted, &weights)
            .unwrap()
            .lookup("C-dong")
            .unwrap()
            .index;

        assert!(after >= before);
    }

    #[test]
    fn test_top_ratio_row_gets_full_opportunity_score() {
        let table = rank_table(&abc_records(), &ScoringWeights::default()).unwrap();
        let a = table.lookup("A-dong").unwrap();
        assert!((a.scores.opportunity - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_table_errors() {
        let err = rank_table(&[], &ScoringWeights::default()).unwrap_err();
        assert!(err.to_string().contains("no neighborhoods"));
    }

    #[test]
    fn test_invalid_weights_error() {
        let weights = ScoringWeights {
            opportunity: 0.9,
            ..ScoringWeights::default()
        };
        let err = rank_table(&abc_records(), &weights).unwrap_err();
        assert!(err.to_string().contains("invalid scoring weights"));
    }

    #[test]
    fn test_single_row_table() {
        let records = vec![dong("Only-dong", 100.0, 1.0, 5.0, 70.0, 30.0, 40.0, 100.0, 2)];
        let table = rank_table(&records, &ScoringWeights::default()).unwrap();
        assert_eq!(table.len(), 1);
        let row = table.lookup("Only-dong").unwrap();
        assert_eq!(row.rank, 1);
        // Alone in the table, the row is its own maximum on both
        // table-relative axes.
        assert_eq!(row.scores.opportunity, 100.0);
        assert_eq!(row.scores.competition, 0.0);
    }

    #[test]
    fn test_zero_employees_everywhere_scores_zero_opportunity() {
        let records = vec![
            dong("A", 0.0, 5.0, 10.0, 100.0, 50.0, 30.0, 150.0, 2),
            dong("B", 0.0, 3.0, 8.0, 90.0, 60.0, 20.0, 150.0, 3),
        ];
        let table = rank_table(&records, &ScoringWeights::default()).unwrap();
        for row in table.iter() {
            assert_eq!(row.scores.opportunity, 0.0);
        }
    }
}
