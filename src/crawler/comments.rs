//! Nested comment fetch for a single pull request

use crate::crawler::fetcher::RemoteReader;
use crate::crawler::models::{decode, Comment, PullRequest};
use crate::{ChronicleError, Stage};

/// Fetches the comments of one pull request
///
/// Performs exactly one request to the pull request's `comments_url`; the
/// comment listing is not paginated. Comments keep the server's order and are
/// tagged with the owning pull request's number.
///
/// # Returns
///
/// * `Ok(Vec<Comment>)` - The comments, possibly none
/// * `Err(ChronicleError)` - The fetch failed or the body was not a comment list
pub async fn fetch_comments(
    reader: &mut RemoteReader,
    pull: &PullRequest,
) -> Result<Vec<Comment>, ChronicleError> {
    let response = reader.get(&pull.comments_url, Stage::Comments).await?;

    let mut comments: Vec<Comment> = decode(&response, Stage::Comments)?;
    for comment in &mut comments {
        comment.pull_number = pull.number;
    }

    tracing::trace!("PR #{}: {} comments", pull.number, comments.len());
    Ok(comments)
}
