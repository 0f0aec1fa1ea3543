use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scoring::MarketChange;

/// One row of the neighborhood table. Field names double as the CSV column
/// names and as the stable JSON keys consumed by external presentation
/// layers.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DongRecord {
    /// Administrative neighborhood name, unique across the table.
    pub dong: String,

    /// Office workers employed in the dong.
    pub employees: f64,
    /// Low-price-format cafe stores.
    pub low_price_cafes: f64,
    /// All cafe stores.
    pub total_cafes: f64,
    /// Monthly card sales on weekdays (Mon-Fri), won.
    pub weekday_sales: f64,
    /// Monthly card sales on weekends, won.
    pub weekend_sales: f64,
    /// Monthly card sales inside the 06:00-14:00 peak window, won.
    pub peak_sales: f64,
    /// Total monthly card sales, won.
    pub total_sales: f64,
    /// Market-change level on the 1..=4 scale.
    pub market_change: MarketChange,

    // Time-band and day-of-week sales plus store-churn columns are only read
    // by the report renderer; the score engine never touches them.
    #[serde(default)]
    pub sales_00_06: f64,
    #[serde(default)]
    pub sales_06_11: f64,
    #[serde(default)]
    pub sales_11_14: f64,
    #[serde(default)]
    pub sales_14_17: f64,
    #[serde(default)]
    pub sales_17_21: f64,
    #[serde(default)]
    pub sales_21_24: f64,

    #[serde(default)]
    pub sales_mon: f64,
    #[serde(default)]
    pub sales_tue: f64,
    #[serde(default)]
    pub sales_wed: f64,
    #[serde(default)]
    pub sales_thu: f64,
    #[serde(default)]
    pub sales_fri: f64,
    #[serde(default)]
    pub sales_sat: f64,
    #[serde(default)]
    pub sales_sun: f64,

    #[serde(default)]
    pub traffic_age_10: f64,
    #[serde(default)]
    pub traffic_age_20: f64,
    #[serde(default)]
    pub traffic_age_30: f64,
    #[serde(default)]
    pub traffic_age_40: f64,
    #[serde(default)]
    pub traffic_age_50: f64,
    #[serde(default)]
    pub traffic_age_60_plus: f64,
    #[serde(default)]
    pub traffic_male: f64,
    #[serde(default)]
    pub traffic_female: f64,

    /// Share of stores opened over the reference period, percent.
    #[serde(default)]
    pub open_rate: f64,
    /// Share of stores closed over the reference period, percent.
    #[serde(default)]
    pub close_rate: f64,
    /// Average months a surviving store has been operating.
    #[serde(default)]
    pub avg_open_months: f64,
    /// Average months a closed store had been operating.
    #[serde(default)]
    pub avg_close_months: f64,
}

impl DongRecord {
    /// Check the required metric fields. Returns the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.dong.trim().is_empty() {
            return Err("dong name is empty".to_string());
        }
        for (name, value) in [
            ("employees", self.employees),
            ("low_price_cafes", self.low_price_cafes),
            ("total_cafes", self.total_cafes),
            ("weekday_sales", self.weekday_sales),
            ("weekend_sales", self.weekend_sales),
            ("peak_sales", self.peak_sales),
            ("total_sales", self.total_sales),
        ] {
            if !value.is_finite() {
                return Err(format!("{} is not a finite number", name));
            }
            if value < 0.0 {
                return Err(format!("{} is negative ({})", name, value));
            }
        }
        Ok(())
    }

    /// Time-band sales as (label, amount) pairs in clock order.
    pub fn time_bands(&self) -> [(&'static str, f64); 6] {
        [
            ("00-06h", self.sales_00_06),
            ("06-11h", self.sales_06_11),
            ("11-14h", self.sales_11_14),
            ("14-17h", self.sales_14_17),
            ("17-21h", self.sales_17_21),
            ("21-24h", self.sales_21_24),
        ]
    }

    /// Day-of-week sales as (label, amount) pairs, Monday first.
    pub fn day_sales(&self) -> [(&'static str, f64); 7] {
        [
            ("Mon", self.sales_mon),
            ("Tue", self.sales_tue),
            ("Wed", self.sales_wed),
            ("Thu", self.sales_thu),
            ("Fri", self.sales_fri),
            ("Sat", self.sales_sat),
            ("Sun", self.sales_sun),
        ]
    }

    /// Whether any time-band or day-of-week sales were provided.
    pub fn has_rhythm_data(&self) -> bool {
        self.time_bands().iter().any(|(_, v)| *v > 0.0)
            || self.day_sales().iter().any(|(_, v)| *v > 0.0)
    }

    /// Foot traffic by age band as (label, count) pairs, youngest first.
    pub fn age_traffic(&self) -> [(&'static str, f64); 6] {
        [
            ("10s", self.traffic_age_10),
            ("20s", self.traffic_age_20),
            ("30s", self.traffic_age_30),
            ("40s", self.traffic_age_40),
            ("50s", self.traffic_age_50),
            ("60s+", self.traffic_age_60_plus),
        ]
    }

    /// Whether any foot-traffic counts were provided.
    pub fn has_traffic_data(&self) -> bool {
        self.age_traffic().iter().any(|(_, v)| *v > 0.0)
            || self.traffic_male > 0.0
            || self.traffic_female > 0.0
    }
}

/// A row excluded from ranking, with the reason it was turned away.
#[derive(Debug, Clone, Serialize)]
pub struct RejectedRow {
    /// 1-based line in the source file; the header is line 1.
    pub line: u64,
    /// Dong name when the row parsed far enough to have one.
    pub dong: Option<String>,
    pub reason: String,
}

impl fmt::Display for RejectedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.dong {
            Some(dong) => write!(f, "line {} ({}): {}", self.line, dong, self.reason),
            None => write!(f, "line {}: {}", self.line, self.reason),
        }
    }
}

/// Loader output: accepted records plus the rows that were turned away.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<DongRecord>,
    pub rejected: Vec<RejectedRow>,
}
