use chrono::{TimeZone, Utc};
use git2::{Oid, Repository, RepositoryInitOptions, Signature, Time};
use release_notes::domain::{parse_releases, CommitType, TagPolicy};
use release_notes::export::{
    collect_release_data_at, load_release_data, write_release_data, ExportOptions,
};
use release_notes::git::Git2Repository;
use release_notes::markdown::generate_markdown;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const BASE_TIME: i64 = 1_704_067_200; // 2024-01-01 00:00:00 UTC
const HOUR: i64 = 3_600;

// Helper function to setup a temporary git repo on branch "main"
fn init_repo(dir: &Path) -> Repository {
    let mut opts = RepositoryInitOptions::new();
    opts.initial_head("main");
    Repository::init_opts(dir, &opts).expect("Could not init git repo")
}

fn commit_at(repo: &Repository, dir: &Path, content: &str, message: &str, seconds: i64) -> Oid {
    let content_path = dir.join("CHANGELOG.txt");
    fs::write(&content_path, content).expect("Could not write file");

    let mut index = repo.index().expect("Could not get index");
    index
        .add_path(Path::new("CHANGELOG.txt"))
        .expect("Could not add file to index");
    index.write().expect("Could not write index");

    let tree_id = index.write_tree().expect("Could not write tree");
    let tree = repo.find_tree(tree_id).expect("Could not find tree");
    let sig = Signature::new("Test User", "test@example.com", &Time::new(seconds, 0))
        .expect("Could not create signature");

    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .expect("Could not create commit")
}

fn tag(repo: &Repository, name: &str, oid: Oid) {
    let object = repo.find_object(oid, None).expect("Could not find object");
    repo.tag_lightweight(name, &object, false)
        .expect("Could not create tag");
}

/// Four commits: one before v1.0.0, the tagged one, then two incoming changes
fn setup_test_repo() -> (TempDir, Vec<Oid>) {
    let temp_dir = TempDir::new().expect("Could not create temp dir");
    let repo = init_repo(temp_dir.path());

    let oids = vec![
        commit_at(&repo, temp_dir.path(), "a\n", "chore: bootstrap", BASE_TIME),
        commit_at(&repo, temp_dir.path(), "a\nb\n", "feat: first release", BASE_TIME + HOUR),
        commit_at(&repo, temp_dir.path(), "a\nb\nc\n", "fix: crash on empty input\n\nLonger body.", BASE_TIME + 2 * HOUR),
        commit_at(&repo, temp_dir.path(), "a\nc\n", "docs: usage", BASE_TIME + 3 * HOUR),
    ];
    tag(&repo, "v1.0.0", oids[1]);
    tag(&repo, "v1.1.0-rc.1", oids[2]);
    repo.remote("origin", "git@github.com:owner/demo.git")
        .expect("Could not add remote");

    (temp_dir, oids)
}

fn fixed_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, 1, 12, 30, 0).unwrap()
}

#[test]
fn test_export_reads_history_oldest_first() {
    let (temp_dir, oids) = setup_test_repo();
    let repo = Git2Repository::open(temp_dir.path()).expect("Could not open repo");

    let data = collect_release_data_at(&repo, &ExportOptions::default(), fixed_time()).unwrap();

    assert_eq!(data.generated_at, "2024-02-01 12:30:00");
    assert_eq!(data.generated_at_iso.as_deref(), Some("2024-02-01T12:30:00+00:00"));
    assert_eq!(data.repository.branch, "main");
    assert_eq!(data.repository.url, "https://github.com/owner/demo");
    assert!(!data.repository.name.is_empty());

    let hashes: Vec<String> = data.commits.iter().map(|c| c.hash.clone()).collect();
    let expected: Vec<String> = oids.iter().map(|o| o.to_string()).collect();
    assert_eq!(hashes, expected);

    let fix = &data.commits[2];
    assert_eq!(fix.commit_type, CommitType::Fix);
    assert_eq!(fix.message, "fix: crash on empty input\n\nLonger body.");
    assert_eq!(fix.message_short.as_deref(), Some("fix: crash on empty input"));
    assert_eq!(fix.short_hash.len(), 7);
    assert_eq!(fix.timestamp, BASE_TIME + 2 * HOUR);
    assert_eq!(fix.email.as_deref(), Some("test@example.com"));
    assert_eq!(fix.insertions, 1);
    assert_eq!(fix.files_changed, 1);
    assert_eq!(fix.tags, vec!["v1.1.0-rc.1".to_string()]);

    assert_eq!(data.commits[1].tags, vec!["v1.0.0".to_string()]);
    assert_eq!(data.commits[3].deletions, 1);
}

#[test]
fn test_export_limits_to_most_recent_commits() {
    let (temp_dir, oids) = setup_test_repo();
    let repo = Git2Repository::open(temp_dir.path()).expect("Could not open repo");
    let options = ExportOptions {
        branch: "main".to_string(),
        num_commits: 2,
    };

    let data = collect_release_data_at(&repo, &options, fixed_time()).unwrap();
    let hashes: Vec<String> = data.commits.iter().map(|c| c.hash.clone()).collect();
    assert_eq!(hashes, vec![oids[2].to_string(), oids[3].to_string()]);
}

#[test]
fn test_unknown_branch_is_error() {
    let (temp_dir, _) = setup_test_repo();
    let repo = Git2Repository::open(temp_dir.path()).expect("Could not open repo");
    let options = ExportOptions {
        branch: "no-such-branch".to_string(),
        num_commits: 10,
    };
    assert!(collect_release_data_at(&repo, &options, fixed_time()).is_err());
}

#[test]
fn test_exported_history_partitions_by_policy() {
    let (temp_dir, _) = setup_test_repo();
    let repo = Git2Repository::open(temp_dir.path()).expect("Could not open repo");
    let data = collect_release_data_at(&repo, &ExportOptions::default(), fixed_time()).unwrap();

    let strict = parse_releases(&data.commits, TagPolicy::SemverStrict);
    let labels: Vec<&str> = strict.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["v1.0.0", "Incoming"]);
    assert_eq!(strict[0].count(), 3);

    let loose = parse_releases(&data.commits, TagPolicy::PrefixOnly);
    let labels: Vec<&str> = loose.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["v1.1.0-rc.1", "v1.0.0", "Incoming"]);
}

#[test]
fn test_write_then_load_release_data() {
    let (temp_dir, _) = setup_test_repo();
    let repo = Git2Repository::open(temp_dir.path()).expect("Could not open repo");
    let data = collect_release_data_at(&repo, &ExportOptions::default(), fixed_time()).unwrap();

    let out = TempDir::new().unwrap();
    let path = out.path().join("release_notes.json");
    write_release_data(&path, &data).unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"type\": \"fix\""));
    assert!(raw.contains("\"generated_at\""));

    assert_eq!(load_release_data(&path).unwrap(), data);

    let markdown = generate_markdown(&data, TagPolicy::SemverStrict, false);
    assert!(markdown.contains("v1.0.0"));
    assert!(markdown.contains("https://github.com/owner/demo/commit/"));
}

#[test]
fn test_load_reports_missing_and_malformed_files() {
    let dir = TempDir::new().unwrap();
    let missing = load_release_data(dir.path().join("absent.json")).unwrap_err();
    assert!(missing.to_string().starts_with("Release data error"));

    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{\"commits\": [").unwrap();
    let malformed = load_release_data(&broken).unwrap_err();
    assert!(malformed.to_string().contains("Invalid release data"));
}
