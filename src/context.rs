//! Run context: the directories and settings every stage reads.
//!
//! Built once at startup from [`SheetConfig`] and passed by reference to the
//! resolver and the builder. Tests build one with [`Context::with_dirs`]
//! pointing at temp directories.
//!
//! The context owns the process temp directory used for extracted audio
//! covers; it is removed when the context is dropped. If no temp directory
//! can be created, `<home>/snapTemp` is used instead and left in place.

use crate::config::{DocumentConfig, SheetConfig};
use crate::listing::HiddenFilter;
use std::fmt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use thiserror::Error;
use tracing::warn;

const APP_NAME: &str = "snap-sheet";

#[derive(Error, Debug)]
pub enum ContextError {
    #[error("cannot create {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid hidden-file pattern: {0}")]
    Hidden(#[from] regex::Error),
    #[error("no data directory available; set storage_dir in the config")]
    NoStorageDir,
}

#[derive(Debug)]
pub struct Context {
    storage_dir: PathBuf,
    temp_dir: PathBuf,
    // Deletes the temp directory on drop.
    _temp_guard: Option<TempDir>,
    hidden: HiddenFilter,
    document: DocumentConfig,
}

impl Context {
    /// Create directories and compile settings from `config`.
    pub fn from_config(config: &SheetConfig) -> Result<Self, ContextError> {
        let storage_dir = match &config.storage_dir {
            Some(dir) => dir.clone(),
            None => default_storage_dir().ok_or(ContextError::NoStorageDir)?,
        };
        std::fs::create_dir_all(&storage_dir).map_err(|source| ContextError::Io {
            path: storage_dir.clone(),
            source,
        })?;

        let (temp_dir, guard) = match tempfile::Builder::new().prefix(APP_NAME).tempdir() {
            Ok(dir) => (dir.path().to_path_buf(), Some(dir)),
            Err(e) => {
                let fallback = fallback_temp_dir();
                warn!(error = %e, fallback = %fallback.display(), "cannot create temp dir");
                std::fs::create_dir_all(&fallback).map_err(|source| ContextError::Io {
                    path: fallback.clone(),
                    source,
                })?;
                (fallback, None)
            }
        };

        Ok(Self {
            storage_dir,
            temp_dir,
            _temp_guard: guard,
            hidden: HiddenFilter::new(&config.hidden_files)?,
            document: config.document.clone(),
        })
    }

    /// Context over explicit directories with default settings.
    ///
    /// Directories are created lazily by the resolver when first written.
    pub fn with_dirs(storage_dir: impl Into<PathBuf>, temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage_dir: storage_dir.into(),
            temp_dir: temp_dir.into(),
            _temp_guard: None,
            hidden: HiddenFilter::default(),
            document: DocumentConfig::default(),
        }
    }

    pub fn with_document(mut self, document: DocumentConfig) -> Self {
        self.document = document;
        self
    }

    pub fn with_hidden(mut self, hidden: HiddenFilter) -> Self {
        self.hidden = hidden;
        self
    }

    /// Persistent directory for generic icons.
    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// Process-scoped directory for extracted covers.
    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    pub fn hidden(&self) -> &HiddenFilter {
        &self.hidden
    }

    pub fn document(&self) -> &DocumentConfig {
        &self.document
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} (os {}, arch {}), storage {}, temp {}",
            APP_NAME,
            env!("CARGO_PKG_VERSION"),
            std::env::consts::OS,
            std::env::consts::ARCH,
            self.storage_dir.display(),
            self.temp_dir.display()
        )
    }
}

fn default_storage_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join(APP_NAME).join("icons"))
}

fn fallback_temp_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("snapTemp")
}
