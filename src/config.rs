//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::constants::{APP_NAME, CONFIG_DIR_ENV};
use crate::parser::ManifestLayout;

/// Path configuration for file system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// Directory holding the app store (defaults to `<config dir>/store`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_dir: Option<PathBuf>,
}

/// Export configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory where exported manifests and archives are written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Layout used for single-app manifest exports
    #[serde(default = "default_export_layout")]
    pub layout: ManifestLayout,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            layout: default_export_layout(),
        }
    }
}

/// Exports land in the working directory by default.
fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Single-app exports use the reduced section set unless configured otherwise.
const fn default_export_layout() -> ManifestLayout {
    ManifestLayout::Reduced
}

/// Application configuration.
///
/// # File Location
///
/// - `$POINTMAP_CONFIG_DIR/config.toml` when the variable is set
/// - Linux: `~/.config/PointMap/config.toml`
/// - macOS: `~/Library/Application Support/PointMap/config.toml`
/// - Windows: `%APPDATA%\PointMap\config.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// File system paths
    #[serde(default)]
    pub paths: PathConfig,
    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the config directory path.
    ///
    /// Honors `POINTMAP_CONFIG_DIR`, falling back to the platform config
    /// directory.
    pub fn config_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|dir| !dir.is_empty()) {
            return Ok(PathBuf::from(dir));
        }

        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(APP_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;

        if !config_path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(&config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        let config: Self = toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))?;

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the config file using atomic write.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save(&self) -> Result<()> {
        self.validate()?;

        let config_dir = Self::config_dir()?;
        fs::create_dir_all(&config_dir).context(format!(
            "Failed to create config directory: {}",
            config_dir.display()
        ))?;

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        let config_path = Self::config_file_path()?;
        let temp_path = config_path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, &config_path).context(format!(
            "Failed to rename temp config file to: {}",
            config_path.display()
        ))?;

        tracing::debug!(path = %config_path.display(), "Saved configuration");
        Ok(())
    }

    /// Validates configuration values.
    ///
    /// Checks:
    /// - `export.output_dir` is not empty
    /// - `paths.store_dir`, if set, is not an existing file
    pub fn validate(&self) -> Result<()> {
        if self.export.output_dir.as_os_str().is_empty() {
            anyhow::bail!("Export output directory cannot be empty");
        }

        if let Some(store_dir) = &self.paths.store_dir {
            if store_dir.is_file() {
                anyhow::bail!(
                    "Store directory path points to a file: {}",
                    store_dir.display()
                );
            }
        }

        Ok(())
    }

    /// Directory of the app store.
    pub fn store_dir(&self) -> Result<PathBuf> {
        match &self.paths.store_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::config_dir()?.join("store")),
        }
    }
}
