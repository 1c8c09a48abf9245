//! Error types for billscan

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid provider credentials/configuration.
    /// Callers should route the user to settings.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network unreachable or the provider returned a non-2xx status.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The provider returned a response with no content.
    #[error("Empty response: {0}")]
    EmptyResponse(String),

    /// The provider response was not valid JSON, or was valid JSON with a
    /// missing or mistyped required field.
    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
