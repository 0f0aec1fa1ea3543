use std::io::IsTerminal;

use owo_colors::OwoColorize;
use terminal_size::{terminal_size, Width};

use crate::scoring::{RankedTable, ScoredDong};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a dong name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format a won amount in compact notation (1.5k, 2.3M, 847)
pub fn format_won(amount: f64) -> String {
    let formatted = if amount >= 1_000_000.0 {
        format!("{:.1}M", amount / 1_000_000.0)
    } else if amount >= 1_000.0 {
        format!("{:.1}k", amount / 1_000.0)
    } else {
        format!("{:.0}", amount)
    };

    // Trim trailing .0 (e.g., "1.0k" -> "1k")
    formatted.replace(".0M", "M").replace(".0k", "k")
}

/// A fixed-width ASCII bar scaled against `max`. `max <= 0` draws empty.
fn bar(value: f64, max: f64, width: usize) -> String {
    let filled = if max > 0.0 {
        ((value / max) * width as f64).round() as usize
    } else {
        0
    };
    let filled = filled.min(width);
    format!("{}{}", "#".repeat(filled), ".".repeat(width - filled))
}

/// Format the leaderboard, one line per dong.
/// Columns: rank, index, dong, employees-per-low-price-cafe, weekday share,
/// market state. No headers; the dong column absorbs leftover terminal width.
pub fn format_leaderboard(rows: &[&ScoredDong], use_colors: bool) -> String {
    if rows.is_empty() {
        return "No neighborhoods passed the filter.".to_string();
    }

    let term_width = get_terminal_width();
    let separator = "  ";
    // rank "99." + index "100.0" + demand "12345/cafe" + weekday "100% wk"
    // + market label, all separator-joined; the rest goes to the name.
    let fixed_width = 3 + 5 + 10 + 7 + 11 + separator.len() * 5;

    rows.iter()
        .map(|row| {
            let rank_str = format!("{:>2}.", row.rank);
            let index_str = format!("{:>5.1}", row.index);
            let demand_str = format!("{:>5}/cafe", format_won(row.metrics.opportunity_raw));
            let weekday_str = format!("{:>3.0}% wk", row.metrics.weekday_ratio * 100.0);
            let market_str = row.record.market_change.to_string();

            let name = if let Some(width) = term_width {
                if width > fixed_width + 10 {
                    format!(
                        "{:<width$}",
                        truncate_name(&row.record.dong, width - fixed_width),
                        width = width - fixed_width
                    )
                } else {
                    truncate_name(&row.record.dong, 20)
                }
            } else {
                // No terminal (pipe), don't truncate
                format!("{:<24}", row.record.dong)
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}{}",
                    rank_str.dimmed(),
                    index_str.bold(),
                    separator,
                    name,
                    separator,
                    demand_str.cyan(),
                    separator,
                    weekday_str.yellow(),
                    format!("{}{}", separator, market_str)
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}{}{}",
                    rank_str, index_str, separator, name, separator, demand_str, separator,
                    weekday_str, separator, market_str
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the multi-line report for one dong.
pub fn format_dong_report(row: &ScoredDong, total: usize, use_colors: bool) -> String {
    let mut out = String::new();

    let title = if row.is_office_optimal() {
        format!("{}  [office-optimal]", row.record.dong)
    } else {
        row.record.dong.clone()
    };
    if use_colors {
        out.push_str(&format!("{}\n", title.bold()));
    } else {
        out.push_str(&format!("{}\n", title));
    }
    out.push_str(&format!(
        "Rank {} of {}  |  Opportunity Index {:.1}\n",
        row.rank, total, row.index
    ));
    out.push('\n');

    out.push_str("Scores\n");
    out.push_str(&format!(
        "  Opportunity  {:>5.1}  ({} employees per low-price cafe)\n",
        row.scores.opportunity,
        format_won(row.metrics.opportunity_raw)
    ));
    out.push_str(&format!(
        "  Peak window  {:>5.1}  ({:.0}% of sales between 06:00-14:00)\n",
        row.scores.peak,
        row.metrics.peak_ratio * 100.0
    ));
    out.push_str(&format!(
        "  Weekday      {:>5.1}  ({:.0}% of sales on weekdays)\n",
        row.scores.weekday,
        row.metrics.weekday_ratio * 100.0
    ));
    out.push_str(&format!(
        "  Market       {:>5.1}  ({})\n",
        row.scores.market, row.record.market_change
    ));
    out.push_str(&format!(
        "  Low-price    {:>5.1}  ({:.0}% of cafes are low-price format)\n",
        row.scores.low_price,
        row.metrics.low_price_share * 100.0
    ));
    out.push_str(&format!(
        "  Competition  {:>5.1}  ({:.1} cafes per 1k employees)\n",
        row.scores.competition,
        row.metrics.competition_intensity * 1000.0
    ));

    if row.record.has_rhythm_data() {
        let bands = row.record.time_bands();
        let band_max = bands.iter().map(|(_, v)| *v).fold(0.0, f64::max);
        out.push('\n');
        out.push_str("Sales by time of day\n");
        for (label, amount) in bands {
            out.push_str(&format!(
                "  {}  {}  {:>7}\n",
                label,
                bar(amount, band_max, 20),
                format_won(amount)
            ));
        }

        let days = row.record.day_sales();
        let day_max = days.iter().map(|(_, v)| *v).fold(0.0, f64::max);
        out.push('\n');
        out.push_str("Sales by day of week\n");
        for (label, amount) in days {
            out.push_str(&format!(
                "  {}  {}  {:>7}\n",
                label,
                bar(amount, day_max, 20),
                format_won(amount)
            ));
        }
    }

    if row.record.has_traffic_data() {
        let bands = row.record.age_traffic();
        let band_max = bands.iter().map(|(_, v)| *v).fold(0.0, f64::max);
        out.push('\n');
        out.push_str("Foot traffic by age\n");
        for (label, count) in bands {
            out.push_str(&format!(
                "  {:<4}  {}  {:>7}\n",
                label,
                bar(count, band_max, 20),
                format_won(count)
            ));
        }
        if row.record.traffic_male > 0.0 || row.record.traffic_female > 0.0 {
            out.push_str(&format!(
                "  Male {}  |  Female {}\n",
                format_won(row.record.traffic_male),
                format_won(row.record.traffic_female)
            ));
        }
    }

    if row.record.open_rate > 0.0 || row.record.close_rate > 0.0 {
        out.push('\n');
        out.push_str("Market stability\n");
        out.push_str(&format!(
            "  Open rate {:.1}%  |  Close rate {:.1}%\n",
            row.record.open_rate, row.record.close_rate
        ));
        if row.record.avg_open_months > 0.0 {
            out.push_str(&format!(
                "  Surviving stores operate {:.0} months on average (closed: {:.0})\n",
                row.record.avg_open_months, row.record.avg_close_months
            ));
        }
    }

    out
}

/// Format the full annotated table as tab-separated values for scripting.
/// Columns: rank, index, dong, opportunity_raw, weekday_ratio, peak_ratio,
/// low_price_share, competition_intensity, market level (no headers, no
/// colors).
pub fn format_tsv(table: &RankedTable) -> String {
    if table.is_empty() {
        return String::new();
    }

    table
        .iter()
        .map(|row| {
            format!(
                "{}\t{:.2}\t{}\t{:.1}\t{:.4}\t{:.4}\t{:.4}\t{:.6}\t{}",
                row.rank,
                row.index,
                row.record.dong,
                row.metrics.opportunity_raw,
                row.metrics.weekday_ratio,
                row.metrics.peak_ratio,
                row.metrics.low_price_share,
                row.metrics.competition_intensity,
                row.record.market_change.level()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
