//! Error types for groupme-client

use thiserror::Error;

/// groupme-client error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("GroupMe API error: {0}")]
    Api(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed response: missing '{0}'")]
    MalformedResponse(&'static str),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
