use std::io;

/// Errors that can occur during tool selection and command assembly
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("No PowerShell installation found: {0}")]
    ToolNotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for pwsh-runner operations
pub type Result<T> = std::result::Result<T, Error>;
