//! Error handling for rjar

use thiserror::Error;

/// Main error type for rjar operations
#[derive(Error, Debug)]
pub enum RjarError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Proxy error: {0}")]
    Proxy(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Mailer error: {0}")]
    Mailer(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

/// Result type alias for rjar operations
pub type Result<T> = std::result::Result<T, RjarError>;
