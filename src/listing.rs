//! Directory listing for contact sheets.
//!
//! Only direct children are listed, and only directories and regular files;
//! symlinks and special files are skipped. Names matching the hidden-file
//! pattern never reach the sheet. The default pattern hides names that
//! don't start with an ASCII letter, digit or underscore (dotfiles,
//! `~backup`, `#autosave#`, `éclair.jpg`) and names ending in `.bak`.
//!
//! The listing comes back in filesystem order. Ordering belongs to the
//! layout engine, which sorts before it numbers cells.

use regex::Regex;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

/// Default hidden-file pattern.
pub const DEFAULT_HIDDEN_FILES: &str = r"(^[^0-9A-Za-z_].+)|(.+\.bak)$";

#[derive(Error, Debug)]
pub enum ListError {
    #[error("cannot read directory {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Compiled hidden-file pattern.
#[derive(Debug, Clone)]
pub struct HiddenFilter {
    pattern: Regex,
}

impl HiddenFilter {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// True when `name` (a base name, not a path) should be left out.
    pub fn is_hidden(&self, name: &str) -> bool {
        self.pattern.is_match(name)
    }
}

impl Default for HiddenFilter {
    fn default() -> Self {
        Self::new(DEFAULT_HIDDEN_FILES).expect("default hidden pattern must compile")
    }
}

/// List the visible members of `dir`.
pub fn list_directory(dir: &Path, hidden: &HiddenFilter) -> Result<Vec<String>, ListError> {
    let meta = std::fs::metadata(dir).map_err(|source| ListError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(ListError::NotADirectory(dir.to_path_buf()));
    }

    let mut names = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(ListError::Io {
                    path: dir.to_path_buf(),
                    source: e.into(),
                });
            }
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        let file_type = entry.file_type();
        if !file_type.is_dir() && !file_type.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if hidden.is_hidden(&name) {
            continue;
        }
        names.push(name);
    }
    Ok(names)
}
