use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;

use cafe_scout::config::{self, DEFAULT_DATASET};
use cafe_scout::dataset;
use cafe_scout::output;
use cafe_scout::scoring;

const EXIT_SUCCESS: i32 = 0;
const EXIT_DATA: i32 = 1;
const EXIT_LOOKUP: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExportFormat {
    Tsv,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Leaderboard of the most promising dongs (default if no subcommand)
    List {
        /// How many dongs to show
        #[arg(long)]
        top: Option<usize>,

        /// Minimum weekday-sales share in percent (0-100)
        #[arg(long)]
        min_weekday: Option<f64>,
    },
    /// Full report for one dong by name
    Show {
        /// Neighborhood name, e.g. "Yeoksam 1-dong"
        dong: String,
    },
    /// Dump the full annotated table in rank order
    Export {
        #[arg(long, value_enum, default_value = "tsv")]
        format: ExportFormat,
    },
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "cafe-scout")]
#[command(about = "Ranks Seoul neighborhoods by cafe opportunity", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/cafe-scout/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the neighborhood table CSV (overrides the config)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::List {
        top: None,
        min_weekday: None,
    });
    let start_time = Instant::now();
    let config_path = cli.config.map(PathBuf::from);

    // Init only needs the target path, which usually does not exist yet.
    // It must run before load_config, which errors on an explicit missing
    // path.
    if let Commands::Init = command {
        if let Err(e) = config::run_init_wizard(config_path) {
            eprintln!("Init error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config = match config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate scoring weights at startup
    let weights = config.weights.unwrap_or_default();
    if let Err(errors) = scoring::validate_weights(&weights) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    // Resolve the dataset path: flag beats config beats default.
    let data_path = cli
        .data
        .or(config.dataset)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET));

    if cli.verbose {
        eprintln!("Loading dataset from {}", data_path.display());
    }

    let loaded = match dataset::load_dataset_file(&data_path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Dataset error: {:#}", e);
            std::process::exit(EXIT_DATA);
        }
    };

    // Rejected rows change every other row's table-relative score, so they
    // are always reported, not only under --verbose.
    for rejected in &loaded.rejected {
        eprintln!("Warning: skipped {}", rejected);
    }

    if loaded.records.is_empty() {
        eprintln!(
            "Dataset {} has no neighborhoods to analyze.",
            data_path.display()
        );
        std::process::exit(EXIT_DATA);
    }

    if cli.verbose {
        eprintln!(
            "Loaded {} neighborhoods ({} rejected) in {:?}",
            loaded.records.len(),
            loaded.rejected.len(),
            start_time.elapsed()
        );
    }

    let rank_start = Instant::now();
    let table = match scoring::rank_table(&loaded.records, &weights) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Scoring error: {:#}", e);
            std::process::exit(EXIT_DATA);
        }
    };

    if cli.verbose {
        eprintln!("Ranked {} neighborhoods in {:?}", table.len(), rank_start.elapsed());
    }

    let use_colors = output::should_use_colors();

    match command {
        Commands::List { top, min_weekday } => {
            let top = top.unwrap_or(config.leaderboard.top);
            let min_weekday_pct = min_weekday.unwrap_or(config.leaderboard.min_weekday_pct);
            if !(0.0..=100.0).contains(&min_weekday_pct) {
                eprintln!(
                    "Invalid minimum weekday share {}. Must be between 0 and 100.",
                    min_weekday_pct
                );
                std::process::exit(EXIT_CONFIG);
            }

            let rows = table.top_n(top, min_weekday_pct / 100.0);
            println!("{}", output::format_leaderboard(&rows, use_colors));

            if cli.verbose {
                eprintln!();
                eprintln!(
                    "Showing {} of {} neighborhoods (weekday share >= {}%) in {:?}",
                    rows.len(),
                    table.len(),
                    min_weekday_pct,
                    start_time.elapsed()
                );
            }
        }
        Commands::Show { dong } => match table.lookup(&dong) {
            Some(row) => {
                println!("{}", output::format_dong_report(row, table.len(), use_colors));
            }
            None => {
                eprintln!("No neighborhood named \"{}\" in the dataset.", dong);
                let suggestions = table.suggest(&dong, 5);
                if !suggestions.is_empty() {
                    eprintln!("Did you mean:");
                    for name in suggestions {
                        eprintln!("  {}", name);
                    }
                }
                std::process::exit(EXIT_LOOKUP);
            }
        },
        Commands::Export { format } => match format {
            ExportFormat::Tsv => {
                println!("{}", output::format_tsv(&table));
            }
            ExportFormat::Json => match serde_json::to_string_pretty(table.rows()) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Export error: {}", e);
                    std::process::exit(EXIT_DATA);
                }
            },
        },
        Commands::Init => unreachable!("handled before dataset loading"),
    }

    std::process::exit(EXIT_SUCCESS);
}
