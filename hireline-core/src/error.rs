//! Error types for hireline

use thiserror::Error;

/// The main error type for hireline operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Session management errors
    #[error("Session error: {0}")]
    Session(String),

    /// Transport errors (connection drop, websocket fault)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Analyzer collaborator errors
    #[error("Analyzer error: {0}")]
    Analyzer(String),

    /// Wire protocol errors (decodable frame with an unusable shape)
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for hireline operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
