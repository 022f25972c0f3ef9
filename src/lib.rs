//! Amzscan: a keyword-driven Amazon search-results scraper
//!
//! This crate walks paginated Amazon search pages for a list of keywords,
//! extracts and normalizes product cards into structured records, optionally
//! enriches a bounded number of records from their detail pages, and hands
//! every record to a pluggable result sink.

pub mod config;
pub mod crawler;
pub mod driver;
pub mod marketplace;
pub mod output;
pub mod record;
pub mod state;

use thiserror::Error;

/// Main error type for amzscan operations
#[derive(Debug, Error)]
pub enum AmzscanError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Driver error: {0}")]
    Driver(#[from] driver::DriverError),

    #[error("Sink error: {0}")]
    Sink(#[from] output::SinkError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
///
/// These cover failures reading the input file itself. Malformed *values*
/// inside the mapping are never errors: the normalizer degrades every field
/// to a documented default instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read input file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type alias for amzscan operations
pub type Result<T> = std::result::Result<T, AmzscanError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::SearchParameters;
pub use marketplace::Country;
pub use record::{EmittedRecord, ProductRecord};
pub use state::{CrawlState, StopReason};
