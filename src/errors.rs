// Error types shared across the crate

use thiserror::Error;

/// Library-level error type
#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Empty response body from {0}")]
    EmptyBody(String),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("Invalid configuration: {0}")]
    Validation(String),

    #[error("{0}")]
    UnsupportedUpload(String),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type alias using HarvestError
pub type Result<T> = std::result::Result<T, HarvestError>;

impl HarvestError {
    pub fn invalid_url(url: impl Into<String>, reason: impl ToString) -> Self {
        HarvestError::InvalidUrl {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}
