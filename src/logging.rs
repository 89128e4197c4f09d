//! File-backed logging.
//!
//! The terminal belongs to the TUI, so log output goes to a file in the
//! system temp directory with a random name. `ACROTUI_LOG` overrides the
//! configured level using `EnvFilter` syntax.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rand::{distr::Alphanumeric, Rng};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the log filter.
pub const LOG_ENV: &str = "ACROTUI_LOG";

/// Length of the random part of log file names.
const LOG_SUFFIX_LEN: usize = 8;

/// Errors that can occur while setting up logging.
#[derive(Error, Debug)]
pub enum LogError {
    #[error("Failed to create log file {path}: {source}")]
    CreateFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid log level '{0}'")]
    InvalidLevel(String),

    #[error("Invalid {var} value '{value}'")]
    InvalidEnv { var: &'static str, value: String },

    #[error("Failed to install logger: {0}")]
    Install(String),
}

/// A fresh log file name, e.g. `acrotui-x7Kq2PzA.log`.
pub fn log_file_name() -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(LOG_SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("acrotui-{}.log", suffix)
}

/// Builds the log filter: `ACROTUI_LOG` if set, otherwise `level`.
///
/// A set but unparsable `ACROTUI_LOG` is an error, not a silent fallback.
pub fn build_filter(level: &str) -> Result<EnvFilter, LogError> {
    match std::env::var_os(LOG_ENV) {
        Some(value) => match value.to_str() {
            Some(value) => filter_from(Some(value), level),
            None => Err(LogError::InvalidEnv {
                var: LOG_ENV,
                value: value.to_string_lossy().into_owned(),
            }),
        },
        None => filter_from(None, level),
    }
}

fn filter_from(env: Option<&str>, level: &str) -> Result<EnvFilter, LogError> {
    match env {
        Some(value) => EnvFilter::try_new(value).map_err(|_| LogError::InvalidEnv {
            var: LOG_ENV,
            value: value.to_string(),
        }),
        None => EnvFilter::try_new(level).map_err(|_| LogError::InvalidLevel(level.to_string())),
    }
}

/// Installs the global subscriber writing to a new file in `dir`.
///
/// Returns the log file path.
pub fn init(level: &str, dir: &Path) -> Result<PathBuf, LogError> {
    let filter = build_filter(level)?;
    let path = dir.join(log_file_name());
    let file = File::create(&path).map_err(|source| LogError::CreateFile {
        path: path.clone(),
        source,
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| LogError::Install(e.to_string()))?;

    Ok(path)
}
