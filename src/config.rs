//! Reader configuration module.
//!
//! Handles loading, validating, and merging an optional `reader.toml` in the
//! book root. Stock defaults are serialized to a TOML table, the user file is
//! merged over it key by key, and the result is deserialized and validated.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! title = "Book Reader"     # Book title shown in headers
//!
//! [titles]
//! parser = "line"           # "line" (first `# ` line) or "markdown" (pulldown-cmark)
//!
//! [display]
//! width = 100               # Wrap width for rendered chapters (20-400)
//! show_sources = false      # Show the resolved source path under chapter headers
//! ```
//!
//! Config files are sparse; unknown keys are rejected to catch typos early.
//!
//! The chapter-directory naming scheme and the filename priority order are
//! fixed conventions and deliberately absent from this file.

use crate::title::TitleParser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Config file name, looked up in the book root.
pub const CONFIG_FILE: &str = "reader.toml";

const MIN_WIDTH: usize = 20;
const MAX_WIDTH: usize = 400;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Reader configuration loaded from `reader.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReaderConfig {
    /// Book title shown in chapter headers and the table of contents.
    pub title: String,
    /// Title extraction settings.
    pub titles: TitlesConfig,
    /// Terminal display settings.
    pub display: DisplayConfig,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            title: "Book Reader".to_string(),
            titles: TitlesConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl ReaderConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_WIDTH..=MAX_WIDTH).contains(&self.display.width) {
            return Err(ConfigError::Validation(format!(
                "display.width must be {MIN_WIDTH}-{MAX_WIDTH}"
            )));
        }
        if self.title.trim().is_empty() {
            return Err(ConfigError::Validation("title must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TitlesConfig {
    pub parser: TitleParser,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Column at which rendered prose wraps.
    pub width: usize,
    /// Print the resolved source path under each chapter header.
    pub show_sources: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 100,
            show_sources: false,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(ReaderConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config does not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `reader.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load config from `reader.toml` in the book root.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<ReaderConfig, ConfigError> {
    let merged = match load_raw_config(root)? {
        Some(overlay) => merge_toml(stock_defaults_value()?, overlay),
        None => stock_defaults_value()?,
    };
    let config: ReaderConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `reader.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Chapter Reader Configuration
# ============================
# Place this file in the book root as reader.toml.
# All options are optional - uncomment and change what you need.

# Book title shown in chapter headers and the table of contents.
# title = "Book Reader"

# ---------------------------------------------------------------------------
# Chapter titles
# ---------------------------------------------------------------------------
[titles]
# How a chapter title is found in its content file:
#   "line"     - first line starting with "# " (fast, plain-text scan)
#   "markdown" - first level-1 heading per CommonMark; ignores fenced code
#                blocks and understands "Title\n====" headings
# parser = "line"

# ---------------------------------------------------------------------------
# Display
# ---------------------------------------------------------------------------
[display]
# Column at which rendered chapter text wraps (20-400).
# width = 100

# Print the resolved source file under each chapter header.
# show_sources = false
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::write_file;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = ReaderConfig::default();
        assert_eq!(config.title, "Book Reader");
        assert_eq!(config.titles.parser, TitleParser::Line);
        assert_eq!(config.display.width, 100);
        assert!(!config.display.show_sources);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[display]
width = 72
"##;
        let config: ReaderConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.display.width, 72);
        // Default values preserved
        assert!(!config.display.show_sources);
        assert_eq!(config.title, "Book Reader");
    }

    #[test]
    fn parse_markdown_parser() {
        let toml = r##"
title = "The Augmented Programmer"

[titles]
parser = "markdown"
"##;
        let config: ReaderConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.titles.parser, TitleParser::Markdown);
        assert_eq!(config.title, "The Augmented Programmer");
    }

    #[test]
    fn unknown_parser_rejected() {
        let toml = r##"
[titles]
parser = "regex"
"##;
        assert!(toml::from_str::<ReaderConfig>(toml).is_err());
    }

    #[test]
    fn unknown_keys_rejected() {
        let toml = r##"
[display]
colour = "blue"
"##;
        assert!(toml::from_str::<ReaderConfig>(toml).is_err());
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, ReaderConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        write_file(
            &tmp.path().join(CONFIG_FILE),
            r##"
title = "Field Notes"

[display]
show_sources = true
"##,
        );

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.title, "Field Notes");
        assert!(config.display.show_sources);
        // Unspecified values should be defaults
        assert_eq!(config.display.width, 100);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join(CONFIG_FILE), "this is not toml [[[");

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_width() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join(CONFIG_FILE), "[display]\nwidth = 5\n");

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_rejects_blank_title() {
        let config = ReaderConfig {
            title: "   ".to_string(),
            ..ReaderConfig::default()
        };
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_overlay_replaces_scalars_and_keeps_siblings() {
        let base: toml::Value = toml::from_str("[display]\nwidth = 100\nshow_sources = false\n").unwrap();
        let overlay: toml::Value = toml::from_str("[display]\nwidth = 80\n").unwrap();

        let merged = merge_toml(base, overlay);
        let display = merged.get("display").unwrap();
        assert_eq!(display.get("width").unwrap().as_integer(), Some(80));
        assert_eq!(display.get("show_sources").unwrap().as_bool(), Some(false));
    }

    #[test]
    fn stock_defaults_round_trip() {
        let value = stock_defaults_value().unwrap();
        let config: ReaderConfig = value.try_into().unwrap();
        assert_eq!(config, ReaderConfig::default());
    }

    #[test]
    fn stock_config_toml_parses_to_defaults() {
        let config: ReaderConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, ReaderConfig::default());
    }
}
