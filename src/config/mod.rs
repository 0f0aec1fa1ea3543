mod init;
mod schema;

pub use init::run_init_wizard;
pub use schema::{
    Config, LeaderboardConfig, DEFAULT_DATASET, DEFAULT_MIN_WEEKDAY_PCT, DEFAULT_TOP,
};

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the config directory path (~/.config/cafe-scout/)
pub fn get_config_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Could not determine home directory");
    home.join(".config").join("cafe-scout")
}

/// Get the default config file path (~/.config/cafe-scout/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file.
///
/// An explicit `path` must exist; a missing file there is an error. With no
/// `path`, a missing file at the default location is fine, since cafe-scout
/// runs fully on defaults. A file that exists and fails to parse is still an
/// error, never silently ignored.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let (config_path, explicit) = match path {
        Some(p) => (p, true),
        None => (get_config_path(), false),
    };

    if !config_path.exists() {
        if explicit {
            bail!("Config file not found at {}", config_path.display());
        }
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!(
            "Failed to parse config: invalid YAML in {}",
            config_path.display()
        )
    })?;

    Ok(config)
}
