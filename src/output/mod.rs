pub mod formatter;

pub use formatter::{
    format_dong_report, format_leaderboard, format_tsv, format_won, should_use_colors,
};
