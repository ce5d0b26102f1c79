use std::path::PathBuf;

use thiserror::Error;

/// Error type for every daylog write, format, and configuration failure.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("unknown log level '{0}'; expected one of debug, info, notice, warning, error, critical, alert, emergency")]
    UnknownLevel(String),

    #[error("invalid channel name {0:?}: must be non-empty and contain no path separators")]
    InvalidName(String),

    #[error("log context must be a key-value mapping, got {0}")]
    MalformedContext(String),

    #[error("no message supplied for channel '{0}'")]
    MissingMessage(String),

    #[error("failed to write log file {}: {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode log message as JSON: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("invalid writer configuration: {0}")]
    InvalidConfig(String),
}

impl LogError {
    pub fn write_failure(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteFailure {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = LogError> = std::result::Result<T, E>;
