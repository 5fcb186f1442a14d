//! Line formatting for the history file
//!
//! Every logical record occupies exactly one physical line. Line breaks inside
//! titles and bodies are replaced with [`NEWLINE_PLACEHOLDER`].

use crate::crawler::{Comment, PullRequest};

/// Token standing in for a removed line break
pub const NEWLINE_PLACEHOLDER: &str = "<nl>";

/// Marker line written before the commit log
pub const COMMITS_MARKER: &str = "## commits";

/// Marker line written before the first pull request
pub const PULL_REQUESTS_MARKER: &str = "## pull requests";

/// Replaces every `\r\n`, `\n` and `\r` with ` <nl> `
///
/// A `\r\n` pair counts as a single break.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                push_placeholder(&mut out);
            }
            '\n' => push_placeholder(&mut out),
            other => out.push(other),
        }
    }

    out
}

fn push_placeholder(out: &mut String) {
    out.push(' ');
    out.push_str(NEWLINE_PLACEHOLDER);
    out.push(' ');
}

/// `PR #<number> | <title> | <body>`
pub fn pull_request_line(pull: &PullRequest) -> String {
    format!(
        "PR #{} | {} | {}",
        pull.number,
        sanitize(&pull.title),
        sanitize(pull.body.as_deref().unwrap_or(""))
    )
}

/// `<n> comments follow`
pub fn comment_count_line(count: usize) -> String {
    format!("{} comments follow", count)
}

/// `comment <id> on #<number> | <body>`
pub fn comment_line(comment: &Comment) -> String {
    format!(
        "comment {} on #{} | {}",
        comment.id,
        comment.pull_number,
        sanitize(comment.body.as_deref().unwrap_or(""))
    )
}
