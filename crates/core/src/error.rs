use std::io;

/// Errors that can occur during cppcheck-runner operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type alias for cppcheck-runner operations
pub type Result<T> = std::result::Result<T, Error>;
