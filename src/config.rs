//! Configuration loading, merging, and validation.
//!
//! Settings come from TOML files layered over stock defaults:
//!
//! ```text
//! stock defaults
//!   ← <config dir>/snap-sheet/config.toml   (user-wide, optional)
//!   ← --config <file>                       (per invocation, optional)
//! ```
//!
//! Each layer only needs the keys it wants to override. Tables merge key by
//! key; unknown keys are rejected to catch typos early.
//!
//! ```toml
//! # storage_dir = "/path/to/icons"   # default: <data dir>/snap-sheet/icons
//! hidden_files = '(^[^0-9A-Za-z_].+)|(.+\.bak)$'
//!
//! [document]
//! title_font_size = 10
//! label_font_size = 8
//! margin = 15.0
//! max_image_pixels = 240
//! sort = "case-sensitive"
//! ```

use crate::layout::SortOrder;
use crate::listing::DEFAULT_HIDDEN_FILES;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetConfig {
    /// Directory for cached icons. `None` means the platform data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
    /// Regex matched against entry names; matches are left off the sheet.
    pub hidden_files: String,
    /// Page and font settings.
    pub document: DocumentConfig,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            storage_dir: None,
            hidden_files: DEFAULT_HIDDEN_FILES.to_string(),
            document: DocumentConfig::default(),
        }
    }
}

impl SheetConfig {
    /// Validate values that serde can't check on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Err(e) = regex::Regex::new(&self.hidden_files) {
            return Err(ConfigError::Validation(format!(
                "hidden_files is not a valid regex: {e}"
            )));
        }
        let doc = &self.document;
        if !(1.0..=72.0).contains(&doc.title_font_size) {
            return Err(ConfigError::Validation(
                "document.title_font_size must be 1-72".into(),
            ));
        }
        if !(1.0..=72.0).contains(&doc.label_font_size) {
            return Err(ConfigError::Validation(
                "document.label_font_size must be 1-72".into(),
            ));
        }
        if !(0.0..=100.0).contains(&doc.margin) {
            return Err(ConfigError::Validation(
                "document.margin must be 0-100".into(),
            ));
        }
        if doc.max_image_pixels == 0 {
            return Err(ConfigError::Validation(
                "document.max_image_pixels must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Page and font settings for the generated PDF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentConfig {
    /// Bold page header size, in points.
    pub title_font_size: f32,
    /// Cell label size, in points.
    pub label_font_size: f32,
    /// Page margin on all sides, in points.
    pub margin: f32,
    /// Longest edge, in pixels, of an image embedded in the PDF.
    pub max_image_pixels: u32,
    /// File name ordering within a directory.
    pub sort: SortOrder,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            title_font_size: 10.0,
            label_font_size: 8.0,
            margin: 15.0,
            max_image_pixels: 240,
            sort: SortOrder::CaseSensitive,
        }
    }
}

/// User-wide config file location, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("snap-sheet").join("config.toml"))
}

/// Stock defaults as a TOML table, the base layer for merging.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SheetConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config: {e}")))
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

/// Read a config file as a raw TOML value; `Ok(None)` when it doesn't exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge the given layers (lowest priority first) onto the stock defaults,
/// then deserialize and validate.
pub fn resolve_config(layers: Vec<toml::Value>) -> Result<SheetConfig, ConfigError> {
    let merged = layers
        .into_iter()
        .fold(stock_defaults_value()?, merge_toml);
    let config: SheetConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the user config and an optional explicit file on top of it.
///
/// A missing user config is fine; a missing explicit file is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<SheetConfig, ConfigError> {
    let mut layers = Vec::new();
    if let Some(user) = user_config_path()
        && let Some(value) = load_raw_config(&user)?
    {
        layers.push(value);
    }
    if let Some(path) = explicit {
        let content = fs::read_to_string(path)?;
        layers.push(toml::from_str(&content)?);
    }
    resolve_config(layers)
}

/// Fully-commented stock config, printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# snap-sheet configuration
# ========================
# All settings are optional. Values shown below are the defaults.
#
# Files are layered, each overriding the one before:
#   stock defaults
#   <config dir>/snap-sheet/config.toml
#   the file passed with --config
#
# Unknown keys will cause an error.

# Where generated file-type icons are cached between runs.
# Defaults to <data dir>/snap-sheet/icons.
# storage_dir = "/path/to/icons"

# Entries whose name matches this regex are left off the sheet.
# Default: names not starting with a word character, and *.bak files.
hidden_files = '(^[^0-9A-Za-z_].+)|(.+\.bak)$'

# ---------------------------------------------------------------------------
# Document
# ---------------------------------------------------------------------------
[document]
# Bold page header (the directory path), in points.
title_font_size = 10.0

# File name under each thumbnail, in points.
label_font_size = 8.0

# Page margin on all sides, in points.
margin = 15.0

# Images are downscaled so their longest edge is at most this many pixels
# before being embedded. Thumbnails are drawn 80pt wide.
max_image_pixels = 240

# File order within a directory: "case-sensitive" or "case-insensitive".
sort = "case-sensitive"
"##
}
