//! Crawl statistics
//!
//! Counters collected while the crawler writes to the sink.

use std::time::Duration;

/// What a crawl wrote
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Pages of pull requests fetched
    pub pages: u64,

    /// Pull request records written
    pub pull_requests: u64,

    /// Comment records written
    pub comments: u64,

    /// Wall time spent crawling
    pub elapsed: Duration,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Average comments per pull request, 0 when nothing was written
    pub fn comments_per_pull_request(&self) -> f64 {
        if self.pull_requests == 0 {
            0.0
        } else {
            self.comments as f64 / self.pull_requests as f64
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStats) {
    println!("=== Crawl Statistics ===\n");
    println!("  Pages fetched: {}", stats.pages);
    println!("  Pull requests: {}", stats.pull_requests);
    println!(
        "  Comments: {} ({:.1} per pull request)",
        stats.comments,
        stats.comments_per_pull_request()
    );
    println!("  Elapsed: {:.1}s", stats.elapsed.as_secs_f64());
}
