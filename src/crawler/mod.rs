//! Crawler module for pull request pages and their comments
//!
//! This module contains the core crawling logic, including:
//! - Authenticated, paced HTTP fetching
//! - Continuation cursor extraction from `link` headers
//! - The nested per-pull-request comment fetch
//! - The page chain walk that writes everything in order

mod comments;
mod coordinator;
mod cursor;
mod fetcher;
mod models;

pub use comments::fetch_comments;
pub use coordinator::{run_chronicle, PageCrawler};
pub use cursor::next_url;
pub use fetcher::{build_http_client, user_agent, RemoteReader, RemoteResponse};
pub use models::{Comment, Page, PullRequest};
