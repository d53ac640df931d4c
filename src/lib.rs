//! Word-Ripple: a bounded-concurrency word-frequency crawler
//!
//! This crate fetches pages from seed URLs, counts the words on each page,
//! and follows discovered links up to a fixed depth. A shared dedup store
//! guarantees that each URL is fetched at most once per run, and a global
//! admission gate bounds the number of fetches in flight.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod state;
pub mod store;
pub mod url;

use thiserror::Error;

/// Main error type for Word-Ripple operations
#[derive(Debug, Error)]
pub enum RippleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Crawl error: {0}")]
    Crawl(#[from] CrawlError),

    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

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

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),
}

/// Errors returned by a single crawl invocation
///
/// None of these abort the run. `TooDeep` is an expected termination; the
/// others mean this branch of the crawl produced no result.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Depth {depth} exceeds maximum depth {max_depth} for {url}")]
    TooDeep {
        url: String,
        depth: u32,
        max_depth: u32,
    },

    #[error("Request failed for {url}: {message}")]
    BadRequest { url: String, message: String },

    #[error("Unreadable body from {url}: {message}")]
    BadBody { url: String, message: String },

    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),

    #[error("Result sink closed while publishing {url}")]
    SinkClosed { url: String },

    #[error("Admission gate closed")]
    GateClosed,
}

impl CrawlError {
    /// Returns true if this is a normal termination rather than a fault
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::TooDeep { .. })
    }
}

/// Result type alias for Word-Ripple operations
pub type Result<T> = std::result::Result<T, RippleError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for a single crawl invocation
pub type CrawlResult<T> = std::result::Result<T, CrawlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlOutcome, CrawlTask, Scheduler};
pub use state::PageState;
pub use store::{DedupStore, MemoryStore, PageRecord};
