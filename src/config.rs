//! Runtime configuration.
//!
//! Built once from the command line in `main.rs` and handed to the
//! controller. Everything the library needs to know about paths and
//! presentation lives here.

use std::path::PathBuf;

use crate::export::export_file_name;
use crate::store::{open_storage, RecordStore};
use crate::ui::glyphs::{self, Glyphs};

/// Default log level when neither `--log-level` nor the environment set one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Resolved application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Acronym file read at startup
    pub source: PathBuf,
    /// Directory export artifacts are written to
    pub export_dir: PathBuf,
    /// Write every change back to `source`
    pub write_back: bool,
    /// Use Unicode glyphs
    pub fancy: bool,
    /// Log filter directive, e.g. `info` or `acrotui=debug`
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::from(export_file_name()),
            export_dir: PathBuf::from("."),
            write_back: false,
            fancy: false,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Creates a configuration for `source` with default settings.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    /// An empty store wired to the configured storage backend.
    pub fn open_store(&self) -> RecordStore {
        RecordStore::new(open_storage(&self.source, self.write_back))
    }

    pub fn glyphs(&self) -> Glyphs {
        glyphs::select(self.fancy)
    }
}
