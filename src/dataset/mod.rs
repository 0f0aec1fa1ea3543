//! CSV neighborhood-table loader.
//!
//! Parses the per-dong metrics table into `DongRecord`s. Required CSV
//! columns:
//!   dong, employees, low_price_cafes, total_cafes, weekday_sales,
//!   weekend_sales, peak_sales, total_sales, market_change
//! Optional columns (zero when absent):
//!   sales_00_06, sales_06_11, sales_11_14, sales_14_17, sales_17_21,
//!   sales_21_24, sales_mon..sales_sun, traffic_age_10..traffic_age_60_plus,
//!   traffic_male, traffic_female, open_rate, close_rate, avg_open_months,
//!   avg_close_months
//!
//! Rows that fail to parse or validate are excluded from ranking and recorded
//! in `Dataset::rejected` with a line-numbered reason; they are never clamped
//! or defaulted into the table.

mod types;

pub use types::{Dataset, DongRecord, RejectedRow};

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{bail, Context, Result};

/// Load the neighborhood table from a CSV reader.
///
/// Per-row failures (bad field, out-of-range market level, negative metric,
/// duplicate dong name) land in `Dataset::rejected`. The whole load fails
/// only when not a single row survives, which reads as a schema mismatch
/// rather than a few bad rows.
pub fn load_dataset<R: Read>(reader: R) -> Result<Dataset> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records: Vec<DongRecord> = Vec::new();
    let mut rejected: Vec<RejectedRow> = Vec::new();
    let mut seen_dongs: HashSet<String> = HashSet::new();

    for (i, result) in csv_reader.deserialize::<DongRecord>().enumerate() {
        // Data starts on line 2; the header is line 1.
        let line = (i + 2) as u64;
        match result {
            Ok(record) => {
                if let Err(reason) = record.validate() {
                    rejected.push(RejectedRow {
                        line,
                        dong: Some(record.dong.clone()),
                        reason,
                    });
                } else if !seen_dongs.insert(record.dong.clone()) {
                    rejected.push(RejectedRow {
                        line,
                        dong: Some(record.dong.clone()),
                        reason: "duplicate dong name, keeping the first row".to_string(),
                    });
                } else {
                    records.push(record);
                }
            }
            Err(e) => rejected.push(RejectedRow {
                line,
                dong: None,
                reason: e.to_string(),
            }),
        }
    }

    if records.is_empty() && !rejected.is_empty() {
        bail!("no usable rows ({})", rejected[0]);
    }

    Ok(Dataset { records, rejected })
}

/// Load the neighborhood table from a CSV file path.
pub fn load_dataset_file(path: &Path) -> Result<Dataset> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open dataset file at {}", path.display()))?;
    load_dataset(BufReader::new(file))
        .with_context(|| format!("Failed to load dataset file at {}", path.display()))
}
