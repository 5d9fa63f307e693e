use crate::error::Result;
use crate::git::CommitInfo;
use git2::{Commit, ErrorCode, Oid, Repository as Git2Repo, Sort};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn resolve_branch(&self, branch: &str) -> Result<Oid> {
        match self.repo.find_branch(branch, git2::BranchType::Local) {
            Ok(found) => {
                if let Some(oid) = found.get().target() {
                    return Ok(oid);
                }
            }
            Err(e) if e.code() == ErrorCode::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let object = self.repo.revparse_single(branch)?;
        Ok(object.peel_to_commit()?.id())
    }

    /// Files changed, insertions and deletions against the first parent
    fn stats(&self, commit: &Commit<'_>) -> Result<(u64, u64, u64)> {
        let tree = commit.tree()?;
        let parent_tree = match commit.parent(0) {
            Ok(parent) => Some(parent.tree()?),
            Err(_) => None,
        };

        let diff = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;
        let stats = diff.stats()?;

        Ok((
            stats.files_changed() as u64,
            stats.insertions() as u64,
            stats.deletions() as u64,
        ))
    }
}

impl super::Repository for Git2Repository {
    fn list_commits(&self, branch: &str, max_count: usize) -> Result<Vec<CommitInfo>> {
        let head = self.resolve_branch(branch)?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME)?;
        revwalk.push(head)?;

        let mut commits = Vec::new();

        for oid_result in revwalk.take(max_count) {
            let oid = oid_result?;
            let commit = self.repo.find_commit(oid)?;

            let author = commit.author();
            let (files_changed, insertions, deletions) = self.stats(&commit)?;

            commits.push(CommitInfo {
                hash: oid.to_string(),
                author: author.name().unwrap_or("unknown").to_string(),
                email: author.email().unwrap_or("").to_string(),
                timestamp: author.when().seconds(),
                message: String::from_utf8_lossy(commit.message_bytes()).to_string(),
                files_changed,
                insertions,
                deletions,
            });
        }

        debug!(branch, count = commits.len(), "read commits");
        Ok(commits)
    }

    fn tags_by_commit(&self) -> Result<HashMap<String, Vec<String>>> {
        let names = self.repo.tag_names(None)?;
        let mut tags: HashMap<String, Vec<String>> = HashMap::new();

        for name in names.iter().flatten() {
            let reference_name = format!("refs/tags/{}", name);
            let commit = self
                .repo
                .find_reference(&reference_name)
                .and_then(|reference| reference.peel_to_commit());

            match commit {
                Ok(commit) => tags
                    .entry(commit.id().to_string())
                    .or_default()
                    .push(name.to_string()),
                Err(e) => debug!(tag = name, error = %e, "skipping tag without commit"),
            }
        }

        for names in tags.values_mut() {
            names.sort();
        }

        Ok(tags)
    }

    fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        match self.repo.find_remote(remote) {
            Ok(found) => Ok(found.url().map(|url| url.to_string())),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn workdir_name(&self) -> Option<String> {
        self.repo
            .workdir()
            .and_then(|dir| dir.canonicalize().ok())
            .and_then(|dir| dir.file_name().map(|n| n.to_string_lossy().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::Repository;
    use std::fs;
    use tempfile::TempDir;

    fn commit_file(repo: &Git2Repo, dir: &Path, name: &str, content: &str, message: &str) -> Oid {
        fs::write(dir.join(name), content).unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new(name)).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = git2::Signature::now("Test User", "test@example.com").unwrap();
        let parents: Vec<Commit<'_>> = match repo.head() {
            Ok(head) => vec![head.peel_to_commit().unwrap()],
            Err(_) => vec![],
        };
        let parent_refs: Vec<&Commit<'_>> = parents.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
            .unwrap()
    }

    #[test]
    fn test_reads_commits_tags_and_stats() {
        let dir = TempDir::new().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();

        let first = commit_file(&repo, dir.path(), "a.txt", "one\n", "Initial commit");
        let obj = repo.find_object(first, None).unwrap();
        repo.tag_lightweight("v1.0.0", &obj, false).unwrap();
        let sig = git2::Signature::now("Test User", "test@example.com").unwrap();
        repo.tag("1.0.0", &obj, &sig, "annotated", false).unwrap();
        commit_file(&repo, dir.path(), "a.txt", "one\ntwo\nthree\n", "feat: more lines");
        drop(obj);

        let wrapped = Git2Repository::from_git2(repo);
        let head = wrapped.repo.head().unwrap().shorthand().unwrap().to_string();
        let commits = wrapped.list_commits(&head, 10).unwrap();

        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].message.trim(), "feat: more lines");
        assert_eq!(commits[0].insertions, 2);
        assert_eq!(commits[0].files_changed, 1);
        assert_eq!(commits[1].hash, first.to_string());
        assert_eq!(commits[1].author, "Test User");

        let tags = wrapped.tags_by_commit().unwrap();
        assert_eq!(
            tags.get(&first.to_string()),
            Some(&vec!["1.0.0".to_string(), "v1.0.0".to_string()])
        );

        assert_eq!(wrapped.remote_url("origin").unwrap(), None);
    }

    #[test]
    fn test_max_count_limits_walk() {
        let dir = TempDir::new().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();
        for i in 0..4 {
            commit_file(&repo, dir.path(), "f.txt", &i.to_string(), &format!("commit {}", i));
        }

        let wrapped = Git2Repository::from_git2(repo);
        let commits = wrapped.list_commits("HEAD", 3).unwrap();
        assert_eq!(commits.len(), 3);
        assert!(commits[0].message.starts_with("commit 3"));
    }
}
