//! Error types for the fixture service

use thiserror::Error;

/// Result type alias using FixtureError
pub type FixtureResult<T> = std::result::Result<T, FixtureError>;

/// Fixture service error types
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Failed to bind fixture listener: {0}")]
    Bind(std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
