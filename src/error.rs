//! Error types for distribution extraction

use thiserror::Error;

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, DistributionError>;

/// Extraction errors
#[derive(Error, Debug)]
pub enum DistributionError {
    #[error("Broken reference {pointer}: segment '{segment}' does not exist")]
    BrokenPointer { pointer: String, segment: String },

    #[error("Invalid schema document: {0}")]
    InvalidDocument(String),

    #[error("HTTP error fetching {url}: status {status}")]
    Http { url: String, status: u16 },

    #[error("Fetch error: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),
}
