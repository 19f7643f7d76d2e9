//! Configuration management for the changelog parser
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (changelog.toml)
//! - Environment variables (CHANGELOG__*)
//!
//! ## Example config file (changelog.toml):
//! ```toml
//! [source]
//! path = "docs/CHANGELOG.md"
//!
//! [parser]
//! heading_marker = "#"
//! bullet_marker = "- "
//!
//! [export]
//! output_format = "compact"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scanner::ScanOptions;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangelogConfig {
    /// Where to read the changelog from
    #[serde(default)]
    pub source: SourceConfig,

    /// Scanner settings
    #[serde(default)]
    pub parser: ParserConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,
}

/// Source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Path to the markdown changelog
    #[serde(default = "default_source_path")]
    pub path: PathBuf,
}

/// Scanner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Character that opens a heading; its count is the heading level
    #[serde(default = "default_heading_marker")]
    pub heading_marker: char,

    /// Prefix of a change entry line
    #[serde(default = "default_bullet_marker")]
    pub bullet_marker: String,
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Output format (pretty or compact)
    #[serde(default)]
    pub output_format: OutputFormat,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

// Default value functions
fn default_source_path() -> PathBuf {
    PathBuf::from("CHANGELOG.md")
}

fn default_heading_marker() -> char {
    '#'
}

fn default_bullet_marker() -> String {
    "- ".to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: default_source_path(),
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            heading_marker: default_heading_marker(),
            bullet_marker: default_bullet_marker(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Pretty,
        }
    }
}

impl From<&ParserConfig> for ScanOptions {
    fn from(config: &ParserConfig) -> Self {
        Self {
            heading_marker: config.heading_marker,
            bullet_marker: config.bullet_marker.clone(),
        }
    }
}

impl ChangelogConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, adding a specific file on top of the defaults
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "changelog.toml",
            ".changelog.toml",
            "config/changelog.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "changelog", "changelog-parser") {
            let xdg_config = config_dir.config_dir().join("changelog.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (CHANGELOG__*)
        builder = builder.add_source(
            Environment::with_prefix("CHANGELOG")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions::from(&self.parser)
    }
}
