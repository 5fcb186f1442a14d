//! repo-chronicle: a repository history aggregator
//!
//! This crate collects a repository's commit log and every pull request's
//! title, body and comments into a single ordered text file. Pull requests are
//! read page by page from a rate-limited remote API, strictly one request at a
//! time, following the continuation cursors the server hands back.

pub mod auth;
pub mod config;
pub mod crawler;
pub mod history;
pub mod output;

use std::fmt;
use thiserror::Error;

/// Which part of the crawl a remote request belonged to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Fetching a page of pull requests
    Page,
    /// Fetching the comments of a single pull request
    Comments,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Page => f.write_str("page fetch"),
            Stage::Comments => f.write_str("comment fetch"),
        }
    }
}

/// Main error type for repo-chronicle operations
#[derive(Debug, Error)]
pub enum ChronicleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error during {stage} of {url}: {source}")]
    Transport {
        url: String,
        stage: Stage,
        source: reqwest::Error,
    },

    #[error("Credential rejected (HTTP {status}) during {stage} of {url}")]
    Auth { url: String, stage: Stage, status: u16 },

    #[error("Remote error (HTTP {status}) during {stage} of {url}: {message}")]
    Remote {
        url: String,
        stage: Stage,
        status: u16,
        message: String,
    },

    #[error("Malformed response during {stage} of {url}: {source}")]
    MalformedResponse {
        url: String,
        stage: Stage,
        source: serde_json::Error,
    },

    #[error("Cursor chain revisits {url}")]
    CursorCycle { url: String },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Crawl cancelled")]
    Cancelled,
}

impl ChronicleError {
    /// The URL whose fetch failed, for errors raised by a remote request
    pub fn url(&self) -> Option<&str> {
        match self {
            ChronicleError::Transport { url, .. }
            | ChronicleError::Auth { url, .. }
            | ChronicleError::Remote { url, .. }
            | ChronicleError::MalformedResponse { url, .. }
            | ChronicleError::CursorCycle { url } => Some(url),
            _ => None,
        }
    }

    /// The crawl stage that failed, for errors raised by a remote request
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ChronicleError::Transport { stage, .. }
            | ChronicleError::Auth { stage, .. }
            | ChronicleError::Remote { stage, .. }
            | ChronicleError::MalformedResponse { stage, .. } => Some(*stage),
            _ => None,
        }
    }
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

    #[error("No credential found in environment variable {0}")]
    MissingCredential(String),
}

/// Result type alias for repo-chronicle operations
pub type Result<T> = std::result::Result<T, ChronicleError>;

// Re-export commonly used types
pub use auth::Credential;
pub use config::Config;
pub use crawler::{run_chronicle, PageCrawler, RemoteReader};
pub use output::{AggregationSink, CrawlStats, FileSink};
