//! Error types for the harness

use thiserror::Error;

/// Result type alias using HarnessError
pub type HarnessResult<T> = std::result::Result<T, HarnessError>;

/// Harness error types
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Invalid WebDriver endpoint {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("WebDriver error [{error}]: {message}")]
    Driver { error: String, message: String },

    #[error("Unexpected WebDriver payload: {0}")]
    Protocol(String),

    #[error("Case failed: {0}")]
    CaseFailed(String),

    #[error("Case panicked: {0}")]
    CasePanicked(String),

    #[error("Attachment rejected by sink: {0}")]
    Sink(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),
}
