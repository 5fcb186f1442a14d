//! Output module for the history file
//!
//! This module handles:
//! - The append-only sink the crawler writes to
//! - One-line record formatting and line-break sanitization
//! - Crawl statistics

pub mod record;
mod sink;
pub mod stats;

pub use record::{sanitize, NEWLINE_PLACEHOLDER};
pub use sink::{AggregationSink, FileSink};
pub use stats::{print_statistics, CrawlStats};

use chrono::{SecondsFormat, Utc};

/// Formats the first line of the history file
pub fn header_line(repository_slug: &str) -> String {
    format!(
        "# history of {} generated {}",
        repository_slug,
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}
