//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/chatlens/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/chatlens/` (~/.config/chatlens/)
//! - State/Logs: `$XDG_STATE_HOME/chatlens/` (~/.local/state/chatlens/)
//!
//! Nothing in here is global: the CLI loads a [`Config`], applies its flag
//! overrides, and hands the resolved values to the pipeline explicitly.

use crate::analytics::AnalysisParams;
use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// Export discovery and extraction
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Timeline and correlation settings
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Export discovery and extraction settings
#[derive(Debug, Deserialize, Clone)]
pub struct IngestConfig {
    /// Glob pattern (relative to the export directory) selecting files to parse
    #[serde(default = "default_file_pattern")]
    pub file_pattern: String,

    /// Commit the last pending message when a document ends.
    ///
    /// When disabled, a message is only committed once the next message
    /// block opens, so the final message of the last document is dropped.
    #[serde(default = "default_true")]
    pub flush_trailing_message: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            file_pattern: default_file_pattern(),
            flush_trailing_message: true,
        }
    }
}

fn default_file_pattern() -> String {
    "*".to_string()
}

fn default_true() -> bool {
    true
}

/// Timeline and correlation settings
#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    /// Drop history up to and including this day and restart counts from zero
    #[serde(default)]
    pub amnesty_cutoff: Option<NaiveDate>,

    /// Extend every timeline flat up to the current day
    #[serde(default)]
    pub extend_to_today: bool,

    /// Number of contributors shown in reports
    #[serde(default = "default_top_contributors")]
    pub top_contributors: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            amnesty_cutoff: None,
            extend_to_today: false,
            top_contributors: default_top_contributors(),
        }
    }
}

fn default_top_contributors() -> usize {
    20
}

impl AnalysisConfig {
    /// Resolve the immutable parameter record for one pipeline run.
    ///
    /// `today` is only consulted when `extend_to_today` is set.
    pub fn params(&self, today: NaiveDate) -> AnalysisParams {
        AnalysisParams {
            amnesty_cutoff: self.amnesty_cutoff,
            horizon: self.extend_to_today.then_some(today),
        }
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.top_contributors == 0 {
            return Err(Error::Config(
                "analysis.top_contributors must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.analysis.validate()?;
        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/chatlens/config.toml` (~/.config/chatlens/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("chatlens").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/chatlens/` (~/.local/state/chatlens/). Log files
    /// inside it rotate daily as `chatlens.<YYYY-MM-DD>.log`.
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("chatlens")
    }
}
