use crate::error::{ReleaseNotesError, Result};
use crate::git::{CommitInfo, Repository};
use std::collections::HashMap;

/// Mock repository for testing without actual git operations
///
/// Commits are kept per branch in the order they were added (oldest first)
/// and returned newest first, like a revision walk.
pub struct MockRepository {
    branches: HashMap<String, Vec<CommitInfo>>,
    tags: HashMap<String, Vec<String>>,
    remotes: HashMap<String, String>,
    workdir_name: Option<String>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            branches: HashMap::new(),
            tags: HashMap::new(),
            remotes: HashMap::new(),
            workdir_name: None,
        }
    }

    /// Append a commit to the tip of a branch
    pub fn add_commit(&mut self, branch: impl Into<String>, info: CommitInfo) {
        self.branches.entry(branch.into()).or_default().push(info);
    }

    /// Add a tag pointing at a commit hash
    pub fn add_tag(&mut self, name: impl Into<String>, hash: impl Into<String>) {
        self.tags.entry(hash.into()).or_default().push(name.into());
    }

    pub fn set_remote(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.remotes.insert(name.into(), url.into());
    }

    pub fn set_workdir_name(&mut self, name: impl Into<String>) {
        self.workdir_name = Some(name.into());
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn list_commits(&self, branch: &str, max_count: usize) -> Result<Vec<CommitInfo>> {
        let commits = self.branches.get(branch).ok_or_else(|| {
            ReleaseNotesError::data(format!("Branch not found: {}", branch))
        })?;

        Ok(commits.iter().rev().take(max_count).cloned().collect())
    }

    fn tags_by_commit(&self) -> Result<HashMap<String, Vec<String>>> {
        let mut tags = self.tags.clone();
        for names in tags.values_mut() {
            names.sort();
        }
        Ok(tags)
    }

    fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        Ok(self.remotes.get(remote).cloned())
    }

    fn workdir_name(&self) -> Option<String> {
        self.workdir_name.clone()
    }
}
