#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for the tabulator
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/tabulator/config.toml)
//! - Environment variables
//! - CLI flags (applied by the binary)

pub mod validation;

pub use validation::ValidationOptions;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tabulator_errors::{ConfigError, Error};
use tabulator_types::ReportFormat;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub validation: ValidationOptions,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_deduplicate")]
    pub deduplicate: bool,
    #[serde(default)]
    pub report_format: ReportFormat,
    /// Where report files go; defaults to next to the package
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            deduplicate: true,
            report_format: ReportFormat::Jsonl,
            output_dir: None,
        }
    }
}

fn default_deduplicate() -> bool {
    true
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("tabulator").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path).map_err(|_| ConfigError::NotFound {
            path: path.display().to_string(),
        })?;

        let config: Self = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path),
            None => Self::load(),
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // TABULATOR_DEDUPLICATE
        if let Ok(dedupe) = std::env::var("TABULATOR_DEDUPLICATE") {
            self.general.deduplicate = match dedupe.as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "TABULATOR_DEDUPLICATE".to_string(),
                        value: dedupe,
                    }
                    .into())
                }
            };
        }

        // TABULATOR_REPORT_FORMAT
        if let Ok(format) = std::env::var("TABULATOR_REPORT_FORMAT") {
            self.general.report_format = match format.as_str() {
                "jsonl" => ReportFormat::Jsonl,
                "text" => ReportFormat::Text,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "TABULATOR_REPORT_FORMAT".to_string(),
                        value: format,
                    }
                    .into())
                }
            };
        }

        // TABULATOR_OUTPUT_DIR
        if let Ok(dir) = std::env::var("TABULATOR_OUTPUT_DIR") {
            self.general.output_dir = Some(PathBuf::from(dir));
        }

        // TABULATOR_VALIDATION
        if let Ok(directives) = std::env::var("TABULATOR_VALIDATION") {
            self.validation.apply_directives(&directives)?;
        }

        Ok(())
    }
}
