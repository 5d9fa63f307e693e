use crate::domain::{parse_releases, ReleaseData, TagPolicy};
use crate::export::ORIGIN;
use std::fmt;

/// Non-fatal conditions met while exporting or rendering release notes.
/// These are reported to the user but never stop the run.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// History has commits but none carries a release tag
    NoReleaseTags { commit_count: usize },
    /// The repository has no URL for the named remote
    NoRemoteUrl { remote: String },
    /// The branch has no commits to export
    EmptyHistory { branch: String },
    /// A release label was requested that does not exist
    ReleaseNotFound { label: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoReleaseTags { commit_count } => {
                write!(
                    f,
                    "No release tags found in {} commits; showing commits without release grouping",
                    commit_count
                )
            }
            BoundaryWarning::NoRemoteUrl { remote } => {
                write!(
                    f,
                    "Remote '{}' not found; commit links will be omitted",
                    remote
                )
            }
            BoundaryWarning::EmptyHistory { branch } => {
                write!(f, "Branch '{}' has no commits to export", branch)
            }
            BoundaryWarning::ReleaseNotFound { label } => {
                write!(f, "Release '{}' not found", label)
            }
        }
    }
}

/// Warnings that apply to a release document as a whole
pub fn check_release_data(data: &ReleaseData, policy: TagPolicy) -> Vec<BoundaryWarning> {
    let mut warnings = Vec::new();

    if data.commits.is_empty() {
        warnings.push(BoundaryWarning::EmptyHistory {
            branch: data.repository.branch.clone(),
        });
        return warnings;
    }

    if data.repository.url.is_empty() {
        warnings.push(BoundaryWarning::NoRemoteUrl {
            remote: ORIGIN.to_string(),
        });
    }

    if parse_releases(&data.commits, policy).is_empty() {
        warnings.push(BoundaryWarning::NoReleaseTags {
            commit_count: data.commits.len(),
        });
    }

    warnings
}
