//! Crawl coordinator - page chain walk and stage sequencing
//!
//! This module contains the main crawl loop, which:
//! - Follows the continuation cursor from page to page
//! - Writes each pull request, then fetches and writes its comments, before
//!   moving on to the next pull request
//! - Stops cleanly between pull requests when cancelled
//!
//! It also runs the three stages of a chronicle (sink init, commit log, crawl)
//! strictly one after another.

use crate::auth::Credential;
use crate::config::Config;
use crate::crawler::comments::fetch_comments;
use crate::crawler::fetcher::{build_http_client, RemoteReader};
use crate::crawler::models::{Page, PullRequest};
use crate::history::commit_log;
use crate::output::record::{
    comment_count_line, comment_line, pull_request_line, COMMITS_MARKER, PULL_REQUESTS_MARKER,
};
use crate::output::{header_line, AggregationSink, CrawlStats, FileSink};
use crate::{ChronicleError, Stage};
use std::collections::HashSet;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Walks a cursor-linked chain of pull request pages into a sink
pub struct PageCrawler<S: AggregationSink> {
    reader: RemoteReader,
    sink: S,
    cancel: CancellationToken,
    stats: CrawlStats,
}

impl<S: AggregationSink> PageCrawler<S> {
    /// Creates a new crawler
    ///
    /// # Arguments
    ///
    /// * `reader` - Performs every remote request
    /// * `sink` - Receives every line, in visitation order
    /// * `cancel` - Checked before each page and each pull request
    pub fn new(reader: RemoteReader, sink: S, cancel: CancellationToken) -> Self {
        Self {
            reader,
            sink,
            cancel,
            stats: CrawlStats::new(),
        }
    }

    /// Crawls the full chain starting at `start_url`
    ///
    /// Pages are processed in cursor order. Within a page, pull requests are
    /// written in server order and each one's comment block is complete
    /// before the next pull request's line. The crawl ends successfully only
    /// when a page carries no `next` cursor.
    ///
    /// # Errors
    ///
    /// Any failed page or comment fetch aborts the crawl. Lines already
    /// written stay in the sink.
    pub async fn crawl(&mut self, start_url: &str) -> Result<CrawlStats, ChronicleError> {
        let started = Instant::now();
        let mut visited: HashSet<String> = HashSet::new();
        let mut cursor = Some(start_url.to_string());

        while let Some(url) = cursor.take() {
            self.check_cancelled()?;

            if !visited.insert(url.clone()) {
                return Err(ChronicleError::CursorCycle { url });
            }

            let response = self.reader.get(&url, Stage::Page).await?;
            let page = Page::from_response(&response)?;
            self.stats.pages += 1;

            tracing::info!(
                "Page {}: {} pull requests{}",
                self.stats.pages,
                page.items.len(),
                if page.next.is_some() { "" } else { " (last page)" }
            );

            for pull in &page.items {
                self.check_cancelled()?;
                self.process_pull_request(pull).await?;
            }

            cursor = page.next;
        }

        self.stats.elapsed = started.elapsed();
        tracing::info!(
            "Crawl completed: {} pages, {} pull requests, {} comments in {:?}",
            self.stats.pages,
            self.stats.pull_requests,
            self.stats.comments,
            self.stats.elapsed
        );

        Ok(self.stats.clone())
    }

    /// Writes one pull request followed by its complete comment block
    async fn process_pull_request(&mut self, pull: &PullRequest) -> Result<(), ChronicleError> {
        self.sink.append(&pull_request_line(pull))?;
        self.stats.pull_requests += 1;

        let comments = fetch_comments(&mut self.reader, pull).await?;

        self.sink.append(&comment_count_line(comments.len()))?;
        for comment in &comments {
            self.sink.append(&comment_line(comment))?;
        }
        self.stats.comments += comments.len() as u64;

        Ok(())
    }

    fn check_cancelled(&self) -> Result<(), ChronicleError> {
        if self.cancel.is_cancelled() {
            tracing::warn!(
                "Crawl cancelled after {} pull requests",
                self.stats.pull_requests
            );
            return Err(ChronicleError::Cancelled);
        }
        Ok(())
    }

    /// Counters so far, also meaningful after a failed crawl
    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

/// Runs a complete chronicle
///
/// The stages run strictly in sequence, each finishing before the next starts:
///
/// 1. Truncate the output file and write the header line
/// 2. Append the local commit log (unless `include-commits = false`)
/// 3. Crawl every page of pull requests with their comments
///
/// # Arguments
///
/// * `config` - Validated configuration
/// * `credential` - Attached to every remote request
/// * `cancel` - Stops the crawl between pull requests
///
/// # Example
///
/// ```no_run
/// use repo_chronicle::config::load_config;
/// use repo_chronicle::{run_chronicle, Credential};
/// use std::path::Path;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("chronicle.toml"))?;
/// let credential = Credential::from_env(&config.auth)?;
/// let stats = run_chronicle(&config, credential, CancellationToken::new()).await?;
/// println!("{} pull requests", stats.pull_requests);
/// # Ok(())
/// # }
/// ```
pub async fn run_chronicle(
    config: &Config,
    credential: Credential,
    cancel: CancellationToken,
) -> Result<CrawlStats, ChronicleError> {
    let start_url = config.start_url()?;

    let output_path = Path::new(&config.output.path);
    let mut sink = FileSink::create(output_path, &header_line(&config.repository_slug()))?;
    tracing::info!("Writing history to {}", output_path.display());

    if config.output.include_commits {
        let log = commit_log(Path::new(&config.repository.local_path))?;
        sink.append(COMMITS_MARKER)?;
        if !log.is_empty() {
            sink.append(log.trim_end_matches('\n'))?;
        }
    } else {
        tracing::info!("Skipping commit log");
    }

    sink.append(PULL_REQUESTS_MARKER)?;

    let client = build_http_client(&config.user_agent)?;
    let reader = RemoteReader::new(
        client,
        credential,
        Duration::from_millis(config.api.request_delay_ms),
    );

    let mut crawler = PageCrawler::new(reader, sink, cancel);
    crawler.crawl(start_url.as_str()).await
}
