//! Skitter: a focused, single-session web crawl kernel
//!
//! Given a seed URL, skitter fetches pages one at a time, sniffs their
//! content type, extracts records and outgoing links with pattern rules,
//! and schedules further fetches through a priority-ordered frontier,
//! subject to depth/time/count limits.

pub mod config;
pub mod dedup;
pub mod driver;
pub mod extract;
pub mod frontier;
pub mod priority;
pub mod scope;
pub mod sniff;

use thiserror::Error;

/// Main error type for skitter operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid driver state: expected {expected}, was {actual}")]
    InvalidState {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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

    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Invalid directive '{0}': expected an integer, \"++\", \"--\", or \"drop\"")]
    InvalidDirective(String),
}

/// Result type alias for skitter operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use driver::{CrawlSummary, Driver, DriverState};
pub use frontier::{CrawlLink, Frontier, FrontierLimits};
pub use scope::resolve_loadable;
