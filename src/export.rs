//! Builds the `release_notes.json` document from a repository.

use crate::conventional::classify_commit;
use crate::dates;
use crate::domain::{Commit, ReleaseData, RepositoryInfo};
use crate::error::{ReleaseNotesError, Result};
use crate::git::{CommitInfo, Repository};
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Remote whose URL is used for commit links
pub const ORIGIN: &str = "origin";

/// Longest `message_short` kept, in characters
pub const MESSAGE_SHORT_LEN: usize = 100;

const SHORT_HASH_LEN: usize = 7;
const FALLBACK_REPOSITORY_NAME: &str = "Repository";

/// What to read from the repository
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub branch: String,
    pub num_commits: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            branch: "main".to_string(),
            num_commits: 10,
        }
    }
}

/// Read the last `num_commits` commits of `branch` into a release document,
/// oldest commit first.
pub fn collect_release_data(repo: &impl Repository, options: &ExportOptions) -> Result<ReleaseData> {
    collect_release_data_at(repo, options, Utc::now())
}

/// [`collect_release_data`] with a fixed generation time
pub fn collect_release_data_at(
    repo: &impl Repository,
    options: &ExportOptions,
    generated_at: DateTime<Utc>,
) -> Result<ReleaseData> {
    let mut raw = repo.list_commits(&options.branch, options.num_commits)?;
    raw.reverse();

    let tags = repo.tags_by_commit()?;
    let commits: Vec<Commit> = raw.into_iter().map(|info| to_commit(info, &tags)).collect();

    let url = repo
        .remote_url(ORIGIN)?
        .map(|url| normalize_remote_url(&url))
        .unwrap_or_default();
    let name = repository_name(repo.workdir_name().as_deref(), &url);

    debug!(
        name = %name,
        commits = commits.len(),
        tagged = commits.iter().filter(|c| c.has_tags()).count(),
        "collected release data"
    );

    Ok(ReleaseData {
        generated_at: dates::format_timestamp(generated_at.timestamp()),
        generated_at_iso: Some(generated_at.to_rfc3339_opts(SecondsFormat::Secs, false)),
        repository: RepositoryInfo {
            name,
            branch: options.branch.clone(),
            url,
        },
        commits,
    })
}

fn to_commit(info: CommitInfo, tags: &HashMap<String, Vec<String>>) -> Commit {
    let message = info.message.trim().to_string();
    let first_line = message.lines().next().unwrap_or("").to_string();
    let commit_type = classify_commit(&first_line, &info.author, &info.message);

    let mut commit_tags = tags.get(&info.hash).cloned().unwrap_or_default();
    commit_tags.sort();

    Commit {
        short_hash: info.hash.chars().take(SHORT_HASH_LEN).collect(),
        hash: info.hash,
        author: info.author,
        email: Some(info.email),
        timestamp: info.timestamp,
        message_short: Some(first_line.chars().take(MESSAGE_SHORT_LEN).collect()),
        message,
        commit_type,
        files_changed: info.files_changed,
        insertions: info.insertions,
        deletions: info.deletions,
        tags: commit_tags,
    }
}

/// Turn a remote URL into a browsable https URL
///
/// `git@github.com:owner/repo.git` becomes `https://github.com/owner/repo`.
/// A trailing `.git` is dropped from any URL.
pub fn normalize_remote_url(url: &str) -> String {
    let url = url.trim();
    let url = match url.strip_prefix("git@") {
        Some(rest) => format!("https://{}", rest.replacen(':', "/", 1)),
        None => url.to_string(),
    };

    match url.strip_suffix(".git") {
        Some(stripped) => stripped.to_string(),
        None => url,
    }
}

/// Repository display name: directory name, then the last URL segment
pub fn repository_name(workdir_name: Option<&str>, url: &str) -> String {
    if let Some(name) = workdir_name.filter(|n| !n.is_empty() && *n != ".") {
        return name.to_string();
    }

    url.rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or(FALLBACK_REPOSITORY_NAME)
        .to_string()
}

/// Write the document as pretty JSON
pub fn write_release_data<P: AsRef<Path>>(path: P, data: &ReleaseData) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(data)?;
    fs::write(path, json)?;

    info!(path = %path.display(), commits = data.commits.len(), "wrote release data");
    Ok(())
}

/// Read a release document written by [`write_release_data`]
pub fn load_release_data<P: AsRef<Path>>(path: P) -> Result<ReleaseData> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        ReleaseNotesError::data(format!("Failed to read {}: {}", path.display(), e))
    })?;

    serde_json::from_str(&content).map_err(|e| {
        ReleaseNotesError::data(format!("Invalid release data in {}: {}", path.display(), e))
    })
}
