//! Espi-Watch: an incremental poller for ESPI disclosure listings
//!
//! This crate walks the paginated per-day listing of current reports,
//! returns only the reports published since the last successful check, and
//! keeps a persisted watermark so repeated runs never re-emit a report.

pub mod checkpoint;
pub mod config;
pub mod crawler;
pub mod output;
pub mod report;
pub mod url;

use thiserror::Error;

/// Main error type for Espi-Watch operations
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Checkpoint persistence errors
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("Failed to access checkpoint {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to encode checkpoint: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to replace checkpoint {path}: {source}")]
    Persist {
        path: String,
        source: tempfile::PersistError,
    },
}

/// Page source errors
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("No page registered for {url}")]
    NotFound { url: String },
}

/// Result type alias for Espi-Watch operations
pub type Result<T> = std::result::Result<T, WatchError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for checkpoint operations
pub type CheckpointResult<T> = std::result::Result<T, CheckpointError>;

// Re-export commonly used types
pub use checkpoint::{CheckpointStore, JsonFileStore, MemoryStore};
pub use config::Config;
pub use crawler::{Clock, FixedClock, HttpPageSource, PageSource, ReportWatcher, SystemClock};
pub use report::Report;
pub use url::{ListingUrls, UrlBuilder};
