//! Partitioning of an oldest-first commit list into releases.
//!
//! A release starts at the first commit carrying a qualifying tag and runs up
//! to (not including) the next such commit. Commits before the first release
//! form the virtual "Incoming" group.

use crate::domain::commit::{Commit, CommitType};
use crate::domain::tag::TagPolicy;
use std::collections::{BTreeMap, HashSet};

/// Label of the virtual group holding commits before the first release tag
pub const INCOMING_LABEL: &str = "Incoming";

/// Separator used when several qualifying tags land on the same commit
pub const LABEL_SEPARATOR: &str = " / ";

/// A contiguous slice of commits attributed to one release
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseGroup<'a> {
    pub label: String,
    pub commits: &'a [Commit],
    /// Index of the first commit in the full sequence
    pub start_index: usize,
    pub start_timestamp: i64,
    pub end_timestamp: i64,
    pub is_virtual: bool,
}

impl<'a> ReleaseGroup<'a> {
    fn new(label: String, commits: &'a [Commit], start_index: usize, is_virtual: bool) -> Option<Self> {
        let first = commits.first()?;
        let last = commits.last()?;
        Some(ReleaseGroup {
            label,
            commits,
            start_index,
            start_timestamp: first.timestamp,
            end_timestamp: last.timestamp,
            is_virtual,
        })
    }

    pub fn count(&self) -> usize {
        self.commits.len()
    }

    /// First tagged release in display order, skipping the virtual group
    pub fn latest_real<'g>(groups: &'g [ReleaseGroup<'a>]) -> Option<&'g ReleaseGroup<'a>> {
        groups.iter().find(|group| !group.is_virtual)
    }
}

/// Split `commits` into release groups, newest release first.
///
/// Returns an empty list when no commit carries a qualifying tag; callers
/// decide how to present an untagged history.
pub fn parse_releases(commits: &[Commit], policy: TagPolicy) -> Vec<ReleaseGroup<'_>> {
    parse_releases_with_label(commits, policy, INCOMING_LABEL)
}

/// Same as [`parse_releases`] with a custom label for the virtual group
pub fn parse_releases_with_label<'a>(
    commits: &'a [Commit],
    policy: TagPolicy,
    incoming_label: &str,
) -> Vec<ReleaseGroup<'a>> {
    // Only the first occurrence of a tag name counts.
    let mut seen: HashSet<&str> = HashSet::new();
    let mut first_occurrences: Vec<(&str, usize)> = Vec::new();
    for (index, commit) in commits.iter().enumerate() {
        for tag in &commit.tags {
            if seen.insert(tag.as_str()) {
                first_occurrences.push((tag.as_str(), index));
            }
        }
    }

    // index -> qualifying tags in encounter order
    let mut tags_by_index: BTreeMap<usize, Vec<&str>> = BTreeMap::new();
    for (tag, index) in first_occurrences {
        if policy.qualifies(tag) {
            tags_by_index.entry(index).or_default().push(tag);
        }
    }

    let boundaries: Vec<(usize, String)> = tags_by_index
        .into_iter()
        .map(|(index, tags)| (index, tags.join(LABEL_SEPARATOR)))
        .collect();

    let Some(&(first_index, _)) = boundaries.first() else {
        return Vec::new();
    };

    let mut groups = Vec::with_capacity(boundaries.len() + 1);

    if first_index > 0 {
        groups.extend(ReleaseGroup::new(
            incoming_label.to_string(),
            &commits[..first_index],
            0,
            true,
        ));
    }

    for (position, (start, label)) in boundaries.iter().enumerate() {
        let end = boundaries
            .get(position + 1)
            .map(|(next, _)| *next)
            .unwrap_or(commits.len());
        groups.extend(ReleaseGroup::new(
            label.clone(),
            &commits[*start..end],
            *start,
            false,
        ));
    }

    sort_newest_first(&mut groups);
    groups
}

/// Order groups by start timestamp, newest first. Ties keep their order.
pub fn sort_newest_first(groups: &mut [ReleaseGroup<'_>]) {
    groups.sort_by(|a, b| b.start_timestamp.cmp(&a.start_timestamp));
}

/// Commit counts per type, in display order, zero counts included
pub fn count_by_type<'c>(commits: impl IntoIterator<Item = &'c Commit>) -> Vec<(CommitType, usize)> {
    let mut counts: Vec<(CommitType, usize)> = CommitType::ALL.iter().map(|t| (*t, 0)).collect();
    for commit in commits {
        if let Some(entry) = counts.iter_mut().find(|(t, _)| *t == commit.commit_type) {
            entry.1 += 1;
        }
    }
    counts
}
