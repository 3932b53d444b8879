//! Store settings loading from a TOML file and environment variables.
//!
//! Values are resolved in three layers: built-in defaults, then the optional
//! settings file named by `GG_STORE_SETTINGS`, then `GG_STORE_*` environment
//! variables. Invalid environment values fall back without crashing.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `GG_STORE_SETTINGS` | unset | TOML settings file |
//! | `GG_STORE_CONFIG_PATH` | `configs/models.yaml` | Model config document |
//! | `GG_STORE_LOG_LEVEL` | `info` | Log filter directive |
//! | `GG_STORE_LOG_FORMAT` | `pretty` | `json` or `pretty` |
//! | `GG_STORE_LOG_FILE` | unset | Write logs to this file instead of stderr |

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::telemetry::{LogConfig, LogFormat};

pub const DEFAULT_CONFIG_PATH: &str = "configs/models.yaml";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors reading the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Fully resolved settings.
#[derive(Debug, Clone)]
pub struct StoreSettings {
    /// Model config document path.
    pub config_path: PathBuf,
    pub logging: LogConfig,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            logging: LogConfig::default(),
        }
    }
}

/// On-disk shape of the settings file. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    #[serde(default)]
    store: StoreSection,
    #[serde(default)]
    logging: LoggingSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct StoreSection {
    path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LoggingSection {
    level: Option<String>,
    format: Option<String>,
    file: Option<PathBuf>,
}

/// Parse a log format name, `None` if unrecognized.
pub fn parse_log_format(value: &str) -> Option<LogFormat> {
    match value.trim().to_ascii_lowercase().as_str() {
        "json" => Some(LogFormat::Json),
        "pretty" => Some(LogFormat::Pretty),
        _ => None,
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(val) if !val.trim().is_empty() => Some(val),
        _ => None,
    }
}

impl StoreSettings {
    /// Parse settings from TOML text, layered over the defaults.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, SettingsError> {
        let file: SettingsFile = toml::from_str(text).map_err(|e| SettingsError::Parse {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut settings = Self::default();
        if let Some(path) = file.store.path {
            settings.config_path = path;
        }
        if let Some(level) = file.logging.level {
            settings.logging.level = level;
        }
        if let Some(format) = file.logging.format {
            settings.logging.format =
                parse_log_format(&format).ok_or_else(|| SettingsError::Parse {
                    path: origin.to_path_buf(),
                    message: format!("unknown log format '{}'", format),
                })?;
        }
        settings.logging.output_path = file.logging.file;
        Ok(settings)
    }

    /// Read and parse a TOML settings file.
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Apply `GG_STORE_*` overrides in place.
    pub fn apply_env(&mut self) {
        if let Some(path) = non_empty_var("GG_STORE_CONFIG_PATH") {
            self.config_path = PathBuf::from(path);
        }
        if let Some(level) = non_empty_var("GG_STORE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = non_empty_var("GG_STORE_LOG_FORMAT").and_then(|f| parse_log_format(&f)) {
            self.logging.format = format;
        }
        if let Some(file) = non_empty_var("GG_STORE_LOG_FILE") {
            self.logging.output_path = Some(PathBuf::from(file));
        }
    }
}

/// Load settings from the optional settings file and the environment.
pub fn load() -> Result<StoreSettings, SettingsError> {
    let mut settings = match non_empty_var("GG_STORE_SETTINGS") {
        Some(path) => StoreSettings::from_file(Path::new(&path))?,
        None => StoreSettings::default(),
    };
    settings.apply_env();
    Ok(settings)
}
