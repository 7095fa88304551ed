use thiserror::Error as ThisError;

/// Errors that can occur while building or installing a logger
#[derive(ThisError, Debug)]
pub enum Error {
    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),
    /// Initialization failed.
    #[error("Initialization error: {0}")]
    Init(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
