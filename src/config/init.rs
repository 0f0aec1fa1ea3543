use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_path, DEFAULT_DATASET, DEFAULT_MIN_WEEKDAY_PCT, DEFAULT_TOP};
use crate::scoring::ScoringWeights;

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Render the commented default config written by `init`.
fn default_config_text(dataset: &str, top: usize, min_weekday_pct: f64) -> String {
    let weights = ScoringWeights::default();
    format!(
        "\
# cafe-scout configuration.
# Every key is optional; cafe-scout runs on built-in defaults without it.

# Neighborhood table CSV. The --data flag overrides this.
dataset: {dataset}

leaderboard:
  # Rows shown by `cafe-scout list`.
  top: {top}
  # Minimum weekday-sales share (percent) a dong needs to make the board.
  min_weekday_pct: {min_weekday_pct}

# Opportunity Index weights. Must be non-negative and sum to 1.0.
# Uncomment to change the formula; missing keys keep their defaults.
# weights:
#   opportunity: {opportunity}
#   peak: {peak}
#   weekday: {weekday}
#   market: {market}
#   low_price: {low_price}
#   competition: {competition}
",
        dataset = dataset,
        top = top,
        min_weekday_pct = min_weekday_pct,
        opportunity = weights.opportunity,
        peak = weights.peak,
        weekday = weights.weekday,
        market = weights.market,
        low_price = weights.low_price,
        competition = weights.competition,
    )
}

/// Write the config file, creating parent directories as needed. The target
/// file does not have to exist; a fresh path is the normal init case.
fn write_config(path: &std::path::Path, yaml: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    std::fs::write(path, yaml)
        .with_context(|| format!("Failed to write config to {}", path.display()))
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("cafe-scout configuration");
    println!("========================");
    println!();

    let dataset = prompt_with_default("Neighborhood table CSV", DEFAULT_DATASET)?;
    let top = loop {
        let input = prompt_with_default("Leaderboard rows", &DEFAULT_TOP.to_string())?;
        match input.parse::<usize>() {
            Ok(v) if v >= 1 => break v,
            _ => println!("  Invalid: must be a positive integer. Try again."),
        }
    };
    let min_weekday_pct = loop {
        let input = prompt_with_default(
            "Minimum weekday-sales share (percent)",
            &DEFAULT_MIN_WEEKDAY_PCT.to_string(),
        )?;
        match input.parse::<f64>() {
            Ok(v) if (0.0..=100.0).contains(&v) => break v,
            _ => println!("  Invalid: must be a number between 0 and 100. Try again."),
        }
    };

    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    let yaml = default_config_text(&dataset, top, min_weekday_pct);
    write_config(&config_path, &yaml)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `cafe-scout list` to get started.");

    Ok(())
}
