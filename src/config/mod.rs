//! Configuration module for repo-chronicle
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use repo_chronicle::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("chronicle.toml")).unwrap();
//! println!("Collecting history of {}", config.repository_slug());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ApiConfig, AuthConfig, Config, OutputConfig, PullState, RepositoryConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
