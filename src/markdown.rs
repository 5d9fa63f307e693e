//! Markdown release notes.
//!
//! When the history contains release tags the notes are grouped by release,
//! newest first. Otherwise every commit is listed in chronological order
//! followed by a per-type breakdown.

use crate::dates::format_timestamp;
use crate::domain::{
    count_by_type, parse_releases_with_label, Commit, CommitType, ReleaseData, ReleaseGroup,
    TagPolicy, INCOMING_LABEL,
};

/// Generate markdown for a release document
///
/// With `latest_release_only` only the newest tagged release is kept; this
/// has no effect when the history has no release tags.
pub fn generate_markdown(data: &ReleaseData, policy: TagPolicy, latest_release_only: bool) -> String {
    generate_markdown_with_label(data, policy, INCOMING_LABEL, latest_release_only)
}

/// [`generate_markdown`] with a custom label for untagged leading commits
pub fn generate_markdown_with_label(
    data: &ReleaseData,
    policy: TagPolicy,
    incoming_label: &str,
    latest_release_only: bool,
) -> String {
    let mut lines = header(data);

    let mut releases = parse_releases_with_label(&data.commits, policy, incoming_label);

    if releases.is_empty() {
        lines.extend(by_type(data));
    } else {
        if latest_release_only {
            if let Some(latest) = ReleaseGroup::latest_real(&releases).cloned() {
                releases = vec![latest];
            }
        }
        lines.extend(by_release(&releases, &data.repository.url));
    }

    lines.join("\n")
}

fn header(data: &ReleaseData) -> Vec<String> {
    let mut lines = vec![
        format!("# Release Notes - {}", data.repository.name),
        String::new(),
        format!("**Generated:** {}", data.generated_at),
        format!("**Branch:** {}", data.repository.branch),
    ];
    if !data.repository.url.is_empty() {
        lines.push(format!("**Repository:** {}", data.repository.url));
    }
    lines.extend(["", "---", ""].map(String::from));
    lines
}

/// `` [`abc1234`](url/commit/hash) `` or `` `abc1234` `` without a URL
pub fn commit_link(commit: &Commit, repo_url: &str) -> String {
    if repo_url.is_empty() {
        format!("`{}`", commit.short_hash)
    } else {
        format!("[`{}`]({}/commit/{})", commit.short_hash, repo_url, commit.hash)
    }
}

fn first_line(commit: &Commit) -> &str {
    commit.message.lines().next().unwrap_or("")
}

fn stats_line(commit: &Commit) -> String {
    format!(
        "  - 📊 {} files, +{}/-{} lines",
        commit.files_changed, commit.insertions, commit.deletions
    )
}

fn type_summary<'c>(commits: impl IntoIterator<Item = &'c Commit>) -> Vec<String> {
    count_by_type(commits)
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(commit_type, count)| format!("{} {}: {}", commit_type.icon(), commit_type.label(), count))
        .collect()
}

fn totals<'c>(commits: impl IntoIterator<Item = &'c Commit>) -> (u64, u64, u64) {
    commits.into_iter().fold((0, 0, 0), |(files, ins, del), c| {
        (files + c.files_changed, ins + c.insertions, del + c.deletions)
    })
}

fn by_release(releases: &[ReleaseGroup<'_>], repo_url: &str) -> Vec<String> {
    let mut lines = Vec::new();

    for release in releases {
        let icon = if release.is_virtual { "🚀" } else { "🏷️" };
        lines.push(format!("## {} {}", icon, release.label));
        lines.push(String::new());
        lines.push(format!(
            "**Commits:** {} | **Period:** {} to {}",
            release.count(),
            format_timestamp(release.start_timestamp),
            format_timestamp(release.end_timestamp)
        ));
        lines.push(String::new());

        let summary = type_summary(release.commits);
        if !summary.is_empty() {
            lines.push(format!("**Summary:** {}", summary.join(" | ")));
            lines.push(String::new());
        }

        for commit_type in CommitType::ALL {
            let commits: Vec<&Commit> = release
                .commits
                .iter()
                .filter(|c| c.commit_type == commit_type)
                .collect();
            if commits.is_empty() {
                continue;
            }

            lines.push(format!("### {} {}", commit_type.icon(), commit_type.label()));
            lines.push(String::new());

            for commit in commits {
                lines.push(format!(
                    "- {} ({}) - *{}* - {}",
                    first_line(commit),
                    commit_link(commit, repo_url),
                    commit.author,
                    format_timestamp(commit.timestamp)
                ));
                lines.push(stats_line(commit));
                lines.push(String::new());
            }

            lines.push(String::new());
        }

        lines.push("---".to_string());
        lines.push(String::new());
    }

    let all_commits = releases.iter().flat_map(|r| r.commits.iter());
    let (files, insertions, deletions) = totals(all_commits);
    let commit_count: usize = releases.iter().map(|r| r.count()).sum();

    lines.push("## 📈 Overall Summary".to_string());
    lines.push(String::new());
    lines.push(format!("- **Total Releases:** {}", releases.len()));
    lines.push(format!("- **Total Commits:** {}", commit_count));
    lines.push(format!("- **Files Changed:** {}", files));
    lines.push(format!("- **Insertions:** +{}", insertions));
    lines.push(format!("- **Deletions:** -{}", deletions));
    lines.push(String::new());

    lines
}

fn by_type(data: &ReleaseData) -> Vec<String> {
    let repo_url = &data.repository.url;
    let mut lines = vec!["## 📋 Commits".to_string(), String::new()];

    for commit in &data.commits {
        lines.push(format!(
            "- {} **[{}]** {}",
            commit.commit_type.icon(),
            commit.commit_type.key().to_uppercase(),
            first_line(commit)
        ));
        lines.push(format!(
            "  - {} - *{}* - {}",
            commit_link(commit, repo_url),
            commit.author,
            format_timestamp(commit.timestamp)
        ));

        if commit.has_tags() {
            let tags: Vec<String> = commit.tags.iter().map(|t| format!("`{}`", t)).collect();
            lines.push(format!("  - 🏷️ Tags: {}", tags.join(", ")));
        }

        lines.push(stats_line(commit));
        lines.push(String::new());
    }

    let (files, insertions, deletions) = totals(&data.commits);

    lines.extend(["---", "", "## 📈 Summary", ""].map(String::from));
    lines.push(format!("- **Total Commits:** {}", data.commits.len()));
    lines.push(format!("- **Files Changed:** {}", files));
    lines.push(format!("- **Insertions:** +{}", insertions));
    lines.push(format!("- **Deletions:** -{}", deletions));
    lines.push(String::new());

    lines.push("### Breakdown by Type".to_string());
    lines.push(String::new());
    lines.extend(type_summary(&data.commits).into_iter().map(|s| format!("- {}", s)));
    lines.push(String::new());

    lines
}
