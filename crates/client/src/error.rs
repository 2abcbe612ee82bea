//! Error types for the users client

use thiserror::Error;

/// Result type alias using ClientError
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Users client error types
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
