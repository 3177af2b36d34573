//! Configuration file support
//!
//! Settings are read from a TOML file and merged with command-line
//! overrides; the command line wins.
//!
//! Search order for [`Config::load`]:
//!
//! 1. `./bhashya.toml`
//! 2. `{config_dir}/bhashya-reader/config.toml`
//!
//! # Example
//!
//! ```toml
//! [lines]
//! threshold_factor = 0.5
//! reset_at_page_boundary = true
//!
//! [filter]
//! noise_height_threshold = 50.0
//! title_phrases = ["प्रथमोऽध्यायः"]
//!
//! [classifier]
//! verse_terminator = "॥"
//! page_aware_lookahead = true
//!
//! [output]
//! format = "tagged"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::export::OutputFormat;
use crate::layout::{ClassifierOptions, FilterOptions, LineBuilderOptions};

/// Local configuration file name
pub const LOCAL_CONFIG_FILE: &str = "bhashya.toml";

/// Directory under the user config dir
pub const CONFIG_DIR_NAME: &str = "bhashya-reader";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// `[output]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

/// Contents of a configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub lines: LineBuilderOptions,
    pub filter: FilterOptions,
    pub classifier: ClassifierOptions,
    pub output: OutputConfig,
}

impl Config {
    /// Candidate config files, most specific first
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join(CONFIG_DIR_NAME).join("config.toml"));
        }
        paths
    }

    /// Load the first config file found, or defaults when there is none
    pub fn load() -> Result<Self> {
        match Self::search_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Apply command-line overrides
    pub fn merge_with_cli(&self, cli: &CliOverrides) -> PipelineConfig {
        let mut lines = self.lines.clone();
        if let Some(factor) = cli.threshold_factor {
            lines.threshold_factor = factor;
        }
        if let Some(reset) = cli.reset_at_page_boundary {
            lines.reset_at_page_boundary = reset;
        }

        let mut filter = self.filter.clone();
        if let Some(height) = cli.noise_height_threshold {
            filter.noise_height_threshold = height;
        }
        filter.title_phrases.extend(cli.title_phrases.iter().cloned());

        PipelineConfig {
            lines,
            filter,
            classifier: self.classifier.clone(),
            format: cli.format.unwrap_or(self.output.format),
            threads: cli.threads,
        }
    }
}

/// Values given on the command line. `None` keeps the file value.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub threshold_factor: Option<f64>,
    pub reset_at_page_boundary: Option<bool>,
    pub noise_height_threshold: Option<f64>,
    /// Appended to the configured phrases
    pub title_phrases: Vec<String>,
    pub format: Option<OutputFormat>,
    pub threads: Option<usize>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Effective settings of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineConfig {
    pub lines: LineBuilderOptions,
    pub filter: FilterOptions,
    pub classifier: ClassifierOptions,
    pub format: OutputFormat,
    pub threads: Option<usize>,
}

impl PipelineConfig {
    /// Reject settings the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        let factor = self.lines.threshold_factor;
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "threshold_factor must be positive, got {}",
                factor
            )));
        }

        let height = self.filter.noise_height_threshold;
        if height.is_nan() || height < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "noise_height_threshold must not be negative, got {}",
                height
            )));
        }

        if self
            .filter
            .title_phrases
            .iter()
            .any(|phrase| phrase.trim().is_empty())
        {
            return Err(ConfigError::Invalid(
                "title_phrases must not contain empty phrases".to_string(),
            ));
        }

        if self.threads == Some(0) {
            return Err(ConfigError::Invalid("threads must be at least 1".to_string()));
        }

        Ok(())
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
