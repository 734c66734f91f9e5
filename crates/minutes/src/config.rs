//! Configuration management for meeting-minutes.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::persistence::{ReadPolicy, DEFAULT_STORAGE_KEY};
use crate::storage::BackendKind;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory name used under the platform config and data directories.
const APP_DIR_NAME: &str = "meeting-minutes";

/// Database file name for the `SQLite` backend.
const DATABASE_FILE_NAME: &str = "minutes.db";

/// Prefix for environment overrides. Nested keys use `__`, e.g.
/// `MINUTES_STORAGE__READ_POLICY=strict`.
pub const ENV_PREFIX: &str = "MINUTES_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `MINUTES_`)
/// 2. TOML config file at `~/.config/meeting-minutes/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Export configuration.
    pub export: ExportConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Which backend holds the collection.
    pub backend: BackendKind,
    /// Directory for the file and `SQLite` backends.
    /// Defaults to `~/.local/share/meeting-minutes`
    pub data_dir: Option<PathBuf>,
    /// Key the collection is stored under.
    pub key: String,
    /// Behaviour when the stored collection is unreadable.
    pub read_policy: ReadPolicy,
    /// Byte quota for the memory backend. 0 means unlimited.
    pub quota_bytes: usize,
}

/// Export-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Where exported PDFs go. Defaults to the current directory.
    pub output_dir: Option<PathBuf>,
    /// Base font size in points.
    pub font_size: f32,
    /// Base line height in mm.
    pub line_height_mm: f32,
    /// Left, right, top and bottom margin in mm.
    pub margin_mm: f32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            data_dir: None, // Resolved at runtime
            key: DEFAULT_STORAGE_KEY.to_string(),
            read_policy: ReadPolicy::default(),
            quota_bytes: 0,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            font_size: 10.0,
            line_height_mm: 6.0,
            margin_mm: 15.0,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation
    /// fails.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self> {
        let config_file = config_path.map_or_else(Self::default_config_path, Path::to_path_buf);

        let config: Config = Self::figment(&config_file).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// The layered figment for `config_file`.
    #[must_use]
    pub fn figment(config_file: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(APP_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "storage.key must not be empty".to_string(),
            });
        }

        if self.export.font_size <= 0.0 {
            return Err(Error::ConfigValidation {
                message: format!(
                    "export.font_size must be positive (got {})",
                    self.export.font_size
                ),
            });
        }

        if self.export.line_height_mm <= 0.0 {
            return Err(Error::ConfigValidation {
                message: format!(
                    "export.line_height_mm must be positive (got {})",
                    self.export.line_height_mm
                ),
            });
        }

        if self.export.margin_mm < 0.0 {
            return Err(Error::ConfigValidation {
                message: "export.margin_mm cannot be negative".to_string(),
            });
        }

        Ok(())
    }

    /// Get the data directory, resolving defaults if not set.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Get the `SQLite` database path.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.data_dir().join(DATABASE_FILE_NAME)
    }

    /// Get the export directory, resolving defaults if not set.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.export
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
