//! HTTP fetcher implementation
//!
//! This module handles every request the crawler makes, including:
//! - Building the HTTP client with the identifying user agent
//! - Attaching the credential to each request
//! - Pacing requests so at most one is in flight and they are spaced out
//! - Classifying failures as transport, authentication or remote errors

use crate::auth::Credential;
use crate::config::UserAgentConfig;
use crate::{ChronicleError, Stage};
use reqwest::header::{HeaderMap, ACCEPT, LINK, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tokio::time::Instant;

/// Media type requested from the API
const ACCEPT_JSON: &str = "application/vnd.github+json";

/// How much of an error body is kept for diagnostics
const ERROR_BODY_LIMIT: usize = 200;

/// A successful response, returned verbatim
#[derive(Debug)]
pub struct RemoteResponse {
    /// URL that was requested
    pub url: String,

    /// HTTP status code
    pub status: u16,

    /// Response headers
    pub headers: HeaderMap,

    /// Raw response body
    pub body: String,
}

impl RemoteResponse {
    /// Raw value of the `link` header, if present and valid text
    ///
    /// A header that is not visible ASCII is treated as absent, which ends the
    /// crawl after this page; that case is logged as a warning.
    pub fn link_header(&self) -> Option<&str> {
        let value = self.headers.get(LINK)?;
        match value.to_str() {
            Ok(link) => Some(link),
            Err(_) => {
                tracing::warn!(
                    "Ignoring non-ASCII link header on {}; no further pages will be followed",
                    self.url
                );
                None
            }
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use repo_chronicle::config::UserAgentConfig;
/// use repo_chronicle::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "repo-chronicle".to_string(),
///     crawler_version: "0.1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent(config))
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Format: Name/Version (+ContactURL)
pub fn user_agent(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{})",
        config.crawler_name, config.crawler_version, config.contact_url
    )
}

/// Performs authenticated GET requests, one at a time
///
/// Taking `&mut self` for every request means a single reader can never have
/// two requests in flight.
#[derive(Debug)]
pub struct RemoteReader {
    client: Client,
    credential: Credential,
    min_interval: Duration,
    last_request: Option<Instant>,
}

impl RemoteReader {
    /// Creates a reader
    ///
    /// # Arguments
    ///
    /// * `client` - Client built by [`build_http_client`]
    /// * `credential` - Sent as HTTP Basic authorization on every request
    /// * `min_interval` - Minimum time between the start of two requests
    pub fn new(client: Client, credential: Credential, min_interval: Duration) -> Self {
        Self {
            client,
            credential,
            min_interval,
            last_request: None,
        }
    }

    /// Fetches `url` and returns body and headers verbatim
    ///
    /// # Error classification
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | Connection failure, timeout, unreadable body | `Transport` |
    /// | HTTP 401 | `Auth` |
    /// | HTTP 403 without rate limit headers | `Auth` |
    /// | HTTP 403 with `x-ratelimit-remaining: 0` or `retry-after`, HTTP 429 | `Remote` |
    /// | Any other non-2xx status | `Remote` |
    ///
    /// `stage` only labels the error for diagnostics.
    pub async fn get(&mut self, url: &str, stage: Stage) -> Result<RemoteResponse, ChronicleError> {
        self.pace().await;

        tracing::debug!("GET {} ({})", url, stage);

        let response = self
            .client
            .get(url)
            .basic_auth(self.credential.username(), Some(self.credential.token()))
            .header(ACCEPT, ACCEPT_JSON)
            .send()
            .await
            .map_err(|source| ChronicleError::Transport {
                url: url.to_string(),
                stage,
                source,
            })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|source| ChronicleError::Transport {
                url: url.to_string(),
                stage,
                source,
            })?;

        if !status.is_success() {
            return Err(classify_failure(url, stage, status, &headers, &body));
        }

        let response = RemoteResponse {
            url: url.to_string(),
            status: status.as_u16(),
            headers,
            body,
        };
        tracing::debug!(
            "HTTP {} from {} ({} bytes)",
            response.status,
            response.url,
            response.body.len()
        );

        Ok(response)
    }

    /// Waits until `min_interval` has passed since the previous request
    async fn pace(&mut self) {
        if let Some(last) = self.last_request {
            let ready_at = last + self.min_interval;
            if ready_at > Instant::now() {
                tracing::trace!("Pacing: waiting {:?}", ready_at - Instant::now());
                tokio::time::sleep_until(ready_at).await;
            }
        }
        self.last_request = Some(Instant::now());
    }
}

fn classify_failure(
    url: &str,
    stage: Stage,
    status: StatusCode,
    headers: &HeaderMap,
    body: &str,
) -> ChronicleError {
    let rate_limited = status == StatusCode::TOO_MANY_REQUESTS
        || (status == StatusCode::FORBIDDEN && is_rate_limit_rejection(headers));

    if !rate_limited && (status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN) {
        tracing::warn!("Credential rejected with HTTP {} for {}", status.as_u16(), url);
        return ChronicleError::Auth {
            url: url.to_string(),
            stage,
            status: status.as_u16(),
        };
    }

    let mut message: String = body.chars().take(ERROR_BODY_LIMIT).collect();
    if rate_limited {
        message = format!("rate limit exceeded: {}", message);
    }

    ChronicleError::Remote {
        url: url.to_string(),
        stage,
        status: status.as_u16(),
        message,
    }
}

/// Primary limit: `x-ratelimit-remaining: 0`. Secondary limit: `retry-after`
/// with quota still left.
fn is_rate_limit_rejection(headers: &HeaderMap) -> bool {
    let exhausted = headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim() == "0")
        .unwrap_or(false);

    exhausted || headers.contains_key(RETRY_AFTER)
}
