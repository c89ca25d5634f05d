use std::io;

use thiserror::Error;

use crate::config::ConfigError;

/// Top-level failure of a game run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to open log file {path}: {source}")]
    LogFile {
        path: std::path::PathBuf,
        #[source]
        source: io::Error,
    },
}
