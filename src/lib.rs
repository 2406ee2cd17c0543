//! Sumi-Index: a same-domain crawler with an in-memory inverted index
//!
//! This crate crawls outward from a seed page, following links that share the
//! configured domain prefix until a page budget is spent, and indexes the text
//! of every fetched page so it can be searched by exact token.

pub mod config;
pub mod crawler;
pub mod index;
pub mod output;
pub mod repl;
pub mod storage;

use thiserror::Error;

/// Main error type for Sumi-Index operations
#[derive(Debug, Error)]
pub enum SumiError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Worker pool error: {0}")]
    WorkerPool(String),
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

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlOutcome, CrawlReport};
pub use index::InvertedIndex;
