//! Git access layer
//!
//! The exporter reads history through the [Repository] trait so it can run
//! against a real repository ([repository::Git2Repository]) or an in-memory
//! one in tests ([mock::MockRepository]).

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use std::collections::HashMap;

/// Raw commit data read from a repository
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    /// Full commit hash
    pub hash: String,
    pub author: String,
    pub email: String,
    /// Author time, Unix seconds
    pub timestamp: i64,
    /// Full message, untrimmed
    pub message: String,
    pub files_changed: u64,
    pub insertions: u64,
    pub deletions: u64,
}

/// Read-only view of a repository's history
///
/// All methods return [crate::error::Result]; implementations map their
/// underlying errors (like `git2::Error`) into
/// [crate::error::ReleaseNotesError].
pub trait Repository {
    /// Up to `max_count` commits reachable from `branch`, newest first
    ///
    /// `branch` may be a local branch name or any revision the repository
    /// can resolve (e.g. `HEAD`, `origin/main`).
    fn list_commits(&self, branch: &str, max_count: usize) -> Result<Vec<CommitInfo>>;

    /// Tag names keyed by the full hash of the commit they point at
    ///
    /// Annotated tags are peeled to their commit. Tags that do not resolve to
    /// a commit are skipped.
    fn tags_by_commit(&self) -> Result<HashMap<String, Vec<String>>>;

    /// Configured URL of `remote`, or `None` when the remote does not exist
    fn remote_url(&self, remote: &str) -> Result<Option<String>>;

    /// Name of the working directory, if the repository has one
    fn workdir_name(&self) -> Option<String>;
}
