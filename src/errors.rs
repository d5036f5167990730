use thiserror::Error;

/// Error type that captures expense tracking failures.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid amount `{0}`: must be a number")]
    InvalidAmount(String),
    #[error("Malformed expense file: {0}")]
    MalformedFile(String),
    #[error("Invalid expense #{index}: {reason}")]
    InvalidRecord { index: usize, reason: String },
}

/// Failures of the console itself; everything else is reported as a notice.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
}
