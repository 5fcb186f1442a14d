//! Local revision history
//!
//! Produces the commit log block that is written once, ahead of the pull
//! requests. The crawler never parses this text.

use chrono::DateTime;
use git2::{Commit, ErrorCode, Repository, Sort};
use std::path::Path;

/// Returns the commit log of the repository containing `path`
///
/// One line per commit reachable from HEAD, newest first:
/// `<short-sha> <YYYY-MM-DD> <author>: <summary>`. A repository without any
/// commit yields an empty string.
///
/// # Example
///
/// ```no_run
/// use repo_chronicle::history::commit_log;
/// use std::path::Path;
///
/// let log = commit_log(Path::new(".")).unwrap();
/// println!("{} commits", log.lines().count());
/// ```
pub fn commit_log(path: &Path) -> Result<String, git2::Error> {
    let repo = Repository::discover(path)?;
    tracing::info!("Reading commit log from {}", repo.path().display());

    if let Err(e) = repo.head() {
        if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound {
            tracing::warn!("Repository has no commits yet");
            return Ok(String::new());
        }
        return Err(e);
    }

    let mut revwalk = repo.revwalk()?;
    revwalk.set_sorting(Sort::TIME)?;
    revwalk.push_head()?;

    let mut log = String::new();
    let mut count = 0usize;

    for oid in revwalk {
        let commit = repo.find_commit(oid?)?;
        log.push_str(&format_commit(&commit));
        log.push('\n');
        count += 1;
    }

    tracing::info!("Extracted {} commits", count);
    Ok(log)
}

fn format_commit(commit: &Commit) -> String {
    let id = commit.id().to_string();
    let short = &id[..id.len().min(7)];

    let date = DateTime::from_timestamp(commit.time().seconds(), 0)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "????-??-??".to_string());

    let author = commit.author();
    let name = author.name().unwrap_or("unknown");

    format!(
        "{} {} {}: {}",
        short,
        date,
        name,
        commit.summary().unwrap_or("")
    )
}
