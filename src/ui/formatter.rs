//! Pure formatting functions for UI output.
//!
//! Functions here return strings so they can be tested without a terminal.

use crate::dates::short_date;
use crate::domain::{count_by_type, Commit, ReleaseGroup};

/// `feat 3, fix 1` for the non-zero types, in display order
pub fn format_type_counts<'c>(commits: impl IntoIterator<Item = &'c Commit>) -> String {
    count_by_type(commits)
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(commit_type, count)| format!("{} {}", commit_type.key(), count))
        .collect::<Vec<_>>()
        .join(", ")
}

/// One summary line for a release group.
///
/// `v1.2.0  4 commits  Jan 3 - Jan 9  (feat 3, fix 1)`; the virtual group is
/// marked `(unreleased)`.
pub fn format_release_line(group: &ReleaseGroup<'_>) -> String {
    let label = if group.is_virtual {
        format!("{} (unreleased)", group.label)
    } else {
        group.label.clone()
    };
    let unit = if group.count() == 1 { "commit" } else { "commits" };

    format!(
        "{}  {} {}  {} - {}  ({})",
        label,
        group.count(),
        unit,
        short_date(group.start_timestamp),
        short_date(group.end_timestamp),
        format_type_counts(group.commits)
    )
}
