//! Configuration loading for MathBud.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at ~/.config/mathbud/config.toml.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::MathBudError;
use crate::history::DEFAULT_HISTORY_CAPACITY;

/// Limits applied when accumulating topic notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesConfig {
    /// Maximum concepts kept per topic
    #[serde(default = "default_concept_cap")]
    pub concept_cap: usize,

    /// Maximum example steps kept per topic
    #[serde(default = "default_example_cap")]
    pub example_cap: usize,

    /// Maximum formula steps kept per topic
    #[serde(default = "default_formula_cap")]
    pub formula_cap: usize,

    /// Explanation fragments must be longer than this to count as a concept
    #[serde(default = "default_min_concept_chars")]
    pub min_concept_chars: usize,

    /// Steps must be longer than this to count as an example
    #[serde(default = "default_min_example_chars")]
    pub min_example_chars: usize,
}

fn default_concept_cap() -> usize {
    10
}
fn default_example_cap() -> usize {
    5
}
fn default_formula_cap() -> usize {
    8
}
fn default_min_concept_chars() -> usize {
    10
}
fn default_min_example_chars() -> usize {
    20
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            concept_cap: default_concept_cap(),
            example_cap: default_example_cap(),
            formula_cap: default_formula_cap(),
            min_concept_chars: default_min_concept_chars(),
            min_example_chars: default_min_example_chars(),
        }
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Path to RocksDB storage directory
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Number of solved problems kept in history
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Topic note limits
    #[serde(default)]
    pub notes: NotesConfig,
}

fn default_db_path() -> String {
    ProjectDirs::from("", "", "mathbud")
        .map(|p| p.data_local_dir().join("db"))
        .unwrap_or_else(|| PathBuf::from("./data"))
        .to_string_lossy()
        .to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            log_level: default_log_level(),
            history_capacity: default_history_capacity(),
            notes: NotesConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/mathbud/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (MATHBUD_*)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, MathBudError> {
        let config_dir = ProjectDirs::from("", "", "mathbud")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("db_path", default_db_path())
            .map_err(|e| MathBudError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| MathBudError::Config(e.to_string()))?
            .set_default("history_capacity", default_history_capacity() as i64)
            .map_err(|e| MathBudError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // MATHBUD_DB_PATH, MATHBUD_LOG_LEVEL, MATHBUD_NOTES__CONCEPT_CAP, ...
        builder = builder.add_source(
            Environment::with_prefix("MATHBUD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| MathBudError::Config(e.to_string()))?;

        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| MathBudError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), MathBudError> {
        if self.history_capacity == 0 {
            return Err(MathBudError::Config(
                "history_capacity must be > 0".to_string(),
            ));
        }
        let notes = &self.notes;
        if notes.concept_cap == 0 || notes.example_cap == 0 || notes.formula_cap == 0 {
            return Err(MathBudError::Config(
                "notes caps must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Expand ~ in db_path to actual home directory
    pub fn expanded_db_path(&self) -> PathBuf {
        if let Some(rest) = self.db_path.strip_prefix("~/") {
            if let Some(home) = directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
                return home.join(rest);
            }
        }
        PathBuf::from(&self.db_path)
    }
}
