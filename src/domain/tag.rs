use crate::error::{ReleaseNotesError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Which tags mark a release boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagPolicy {
    /// `[vV]?MAJOR.MINOR.PATCH[+build]`, no pre-release segment
    #[default]
    SemverStrict,
    /// Any tag starting with `v` or `V`
    PrefixOnly,
}

impl TagPolicy {
    /// Whether `tag` qualifies as a release tag under this policy
    pub fn qualifies(&self, tag: &str) -> bool {
        match self {
            TagPolicy::SemverStrict => is_release_version_tag(tag),
            TagPolicy::PrefixOnly => has_version_prefix(tag),
        }
    }
}

impl FromStr for TagPolicy {
    type Err = ReleaseNotesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "semver-strict" | "semver" | "strict" => Ok(TagPolicy::SemverStrict),
            "prefix-only" | "prefix" => Ok(TagPolicy::PrefixOnly),
            other => Err(ReleaseNotesError::config(format!(
                "Unknown tag policy: '{}' (expected 'semver-strict' or 'prefix-only')",
                other
            ))),
        }
    }
}

impl fmt::Display for TagPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagPolicy::SemverStrict => write!(f, "semver-strict"),
            TagPolicy::PrefixOnly => write!(f, "prefix-only"),
        }
    }
}

fn release_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[vV]?[0-9]+\.[0-9]+\.[0-9]+(?:\+[a-zA-Z0-9.-]+)?$").ok())
        .as_ref()
}

/// Stable release tag: SemVer core with optional build metadata.
///
/// Any hyphen rejects the tag, including one inside build metadata, so
/// `v1.0.0+build-1` does not qualify even though the pattern alone would
/// accept it.
pub fn is_release_version_tag(tag: &str) -> bool {
    if tag.contains('-') {
        return false;
    }
    release_pattern().is_some_and(|re| re.is_match(tag))
}

/// Loose variant: anything starting with `v` or `V`
pub fn has_version_prefix(tag: &str) -> bool {
    tag.starts_with('v') || tag.starts_with('V')
}
