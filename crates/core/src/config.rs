//! Application configuration.
//!
//! Values are layered: built-in defaults, then `config.toml` in the user's
//! config directory, then `EXPORT18_*` environment variables.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Directory under the platform config dir holding `config.toml`.
pub const CONFIG_DIR: &str = "18export";
const CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "EXPORT18";

const DEFAULT_CONFIG: &str = r#"# 18export configuration

# Directory holding the game and tile definitions.
# data_root = "/path/to/definitions"

# Tile catalog, relative to data_root.
tiles_file = "tiles.json"

# Directory of game definitions, relative to data_root.
games_dir = "games"

# Default tracing filter; RUST_LOG takes precedence.
log_filter = "info"

# Append logs to this file as well as stderr.
# log_file = "/tmp/18export.log"
"#;

/// Resolved application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Root of the content database.
    pub data_root: PathBuf,
    /// Tile catalog file name, relative to `data_root`.
    pub tiles_file: PathBuf,
    /// Game definition directory, relative to `data_root`.
    pub games_dir: PathBuf,
    /// Default log filter directive.
    pub log_filter: String,
    /// Optional log file.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
            tiles_file: PathBuf::from("tiles.json"),
            games_dir: PathBuf::from("games"),
            log_filter: "info".to_string(),
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file and environment.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load configuration from `path` (which may be missing) and environment.
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let defaults = AppConfig::default();
        let settings = Config::builder()
            .set_default("data_root", defaults.data_root.to_string_lossy().to_string())?
            .set_default("tiles_file", defaults.tiles_file.to_string_lossy().to_string())?
            .set_default("games_dir", defaults.games_dir.to_string_lossy().to_string())?
            .set_default("log_filter", defaults.log_filter)?
            .add_source(File::from(path.clone()).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .with_context(|| format!("failed to load configuration from {}", path.display()))?;

        settings
            .try_deserialize()
            .context("failed to parse configuration")
    }

    /// Path of the tile catalog.
    pub fn tiles_path(&self) -> PathBuf {
        self.data_root.join(&self.tiles_file)
    }

    /// Directory containing game definitions.
    pub fn games_path(&self) -> PathBuf {
        self.data_root.join(&self.games_dir)
    }
}

/// Location of the user's `config.toml`.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}

fn default_data_root() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
}

/// Write the commented default configuration if none exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = config_path();
    write_default_config(&path)?;
    Ok(path)
}

fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write default config {}", path.display()))
}
