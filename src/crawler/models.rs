//! Wire models for the pull request and comment endpoints

use crate::crawler::cursor::next_url;
use crate::crawler::fetcher::RemoteResponse;
use crate::{ChronicleError, Stage};
use serde::Deserialize;

/// One pull request as listed by the collection endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequest {
    pub number: u64,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,

    /// Absent and `null` both mean "no description"
    #[serde(default)]
    pub body: Option<String>,

    /// Where this pull request's comments live
    pub comments_url: String,
}

/// One comment on a pull request
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Comment {
    /// Number of the owning pull request, filled in after decoding
    #[serde(skip)]
    pub pull_number: u64,

    pub id: u64,

    #[serde(default)]
    pub body: Option<String>,
}

/// One fetched page of pull requests
#[derive(Debug)]
pub struct Page {
    /// Pull requests in the order the server returned them
    pub items: Vec<PullRequest>,

    /// Continuation cursor, if the server announced another page
    pub next: Option<String>,
}

impl Page {
    /// Decodes a page body and extracts its continuation cursor
    ///
    /// # Returns
    ///
    /// * `Ok(Page)` - The body is a JSON array of pull requests
    /// * `Err(ChronicleError::MalformedResponse)` - Anything else
    pub fn from_response(response: &RemoteResponse) -> Result<Self, ChronicleError> {
        let items = decode(response, Stage::Page)?;
        Ok(Self {
            items,
            next: next_url(response.link_header()),
        })
    }
}

/// Decodes a JSON array body, tagging failures with the URL and stage
pub(crate) fn decode<T>(response: &RemoteResponse, stage: Stage) -> Result<Vec<T>, ChronicleError>
where
    T: for<'de> Deserialize<'de>,
{
    serde_json::from_str(&response.body).map_err(|source| ChronicleError::MalformedResponse {
        url: response.url.clone(),
        stage,
        source,
    })
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
