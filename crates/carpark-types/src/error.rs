//! Error types for carpark

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error("Missing setting: {0}")]
    Missing(String),
}

/// Recognition cache errors
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache data corrupted: {0}")]
    Corrupted(String),

    #[error("Cache IO error: {0}")]
    IoError(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Missing or malformed input, including text without a recognizable plate
    #[error("{0}")]
    Validation(String),

    #[error("Invalid image format: {0}")]
    InvalidImageFormat(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Plate recognition or other remote service failed
    #[error("Upstream service error: {0}")]
    Upstream(String),

    /// Vehicle registry lookup failed (callers treat this as non-fatal)
    #[error("Registry lookup failed: {0}")]
    Registry(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl Error {
    /// Whether the error was caused by the caller's input rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::InvalidImageFormat(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
