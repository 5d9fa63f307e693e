use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Commit classification used to group release notes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum CommitType {
    Feat,
    Fix,
    Docs,
    Style,
    Refactor,
    Test,
    Perf,
    Ops,
    Chore,
    #[default]
    Other,
}

impl CommitType {
    /// Every type in display order
    pub const ALL: [CommitType; 10] = [
        CommitType::Feat,
        CommitType::Fix,
        CommitType::Docs,
        CommitType::Style,
        CommitType::Refactor,
        CommitType::Test,
        CommitType::Perf,
        CommitType::Ops,
        CommitType::Chore,
        CommitType::Other,
    ];

    /// Parse a serialized key, case-insensitive. Unknown keys are `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "feat" => Some(CommitType::Feat),
            "fix" => Some(CommitType::Fix),
            "docs" => Some(CommitType::Docs),
            "style" => Some(CommitType::Style),
            "refactor" => Some(CommitType::Refactor),
            "test" => Some(CommitType::Test),
            "perf" => Some(CommitType::Perf),
            "ops" => Some(CommitType::Ops),
            "chore" => Some(CommitType::Chore),
            "other" => Some(CommitType::Other),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            CommitType::Feat => "feat",
            CommitType::Fix => "fix",
            CommitType::Docs => "docs",
            CommitType::Style => "style",
            CommitType::Refactor => "refactor",
            CommitType::Test => "test",
            CommitType::Perf => "perf",
            CommitType::Ops => "ops",
            CommitType::Chore => "chore",
            CommitType::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CommitType::Feat => "Features",
            CommitType::Fix => "Bug Fixes",
            CommitType::Docs => "Documentation",
            CommitType::Style => "Code Style",
            CommitType::Refactor => "Code Refactoring",
            CommitType::Test => "Tests",
            CommitType::Perf => "Performance",
            CommitType::Ops => "CI/CD & Build",
            CommitType::Chore => "Chores",
            CommitType::Other => "Other Changes",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            CommitType::Feat => "✨",
            CommitType::Fix => "🐛",
            CommitType::Docs => "📚",
            CommitType::Style => "💎",
            CommitType::Refactor => "♻️",
            CommitType::Test => "✅",
            CommitType::Perf => "⚡",
            CommitType::Ops => "🚀",
            CommitType::Chore => "🔧",
            CommitType::Other => "📌",
        }
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl Serialize for CommitType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for CommitType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .and_then(CommitType::from_key)
            .unwrap_or_default())
    }
}

/// One commit as recorded in `release_notes.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    pub hash: String,
    pub short_hash: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Unix timestamp in seconds
    pub timestamp: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_short: Option<String>,
    #[serde(rename = "type", default)]
    pub commit_type: CommitType,
    #[serde(default)]
    pub files_changed: u64,
    #[serde(default)]
    pub insertions: u64,
    #[serde(default)]
    pub deletions: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Commit {
    /// First line of the message, preferring the recorded short message
    pub fn summary(&self) -> &str {
        match self.message_short.as_deref() {
            Some(short) if !short.is_empty() => short,
            _ => self.message.lines().next().unwrap_or(""),
        }
    }

    pub fn has_tags(&self) -> bool {
        !self.tags.is_empty()
    }
}

/// Repository description carried alongside the commits
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RepositoryInfo {
    pub name: String,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub url: String,
}

/// The whole `release_notes.json` document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseData {
    #[serde(default)]
    pub generated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at_iso: Option<String>,
    pub repository: RepositoryInfo,
    pub commits: Vec<Commit>,
}
