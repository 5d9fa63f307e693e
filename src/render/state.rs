use crate::domain::{Commit, CommitType, ReleaseGroup};
use crate::error::{ReleaseNotesError, Result};
use std::fmt;
use std::str::FromStr;

/// Whether commits are listed flat or grouped by release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Commit,
    Release,
}

impl FromStr for ViewMode {
    type Err = ReleaseNotesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "commit" | "commits" => Ok(ViewMode::Commit),
            "release" | "releases" => Ok(ViewMode::Release),
            other => Err(ReleaseNotesError::render(format!(
                "Unknown view '{}' (expected 'commit' or 'release')",
                other
            ))),
        }
    }
}

/// Which commits stay visible in the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    /// Only commits carrying at least one tag
    Tags,
    Type(CommitType),
}

impl TypeFilter {
    pub fn matches(&self, commit: &Commit) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Tags => commit.has_tags(),
            TypeFilter::Type(commit_type) => commit.commit_type == *commit_type,
        }
    }

    /// Value of the `data-type` attribute of the matching summary card
    pub fn key(&self) -> &'static str {
        match self {
            TypeFilter::All => "all",
            TypeFilter::Tags => "tags",
            TypeFilter::Type(commit_type) => commit_type.key(),
        }
    }
}

impl FromStr for TypeFilter {
    type Err = ReleaseNotesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "all" => Ok(TypeFilter::All),
            "tags" => Ok(TypeFilter::Tags),
            other => CommitType::from_key(other).map(TypeFilter::Type).ok_or_else(|| {
                ReleaseNotesError::render(format!("Unknown filter '{}'", other))
            }),
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Label of the toggle button, which shows the theme it switches to
    pub fn toggle_label(&self) -> &'static str {
        match self {
            Theme::Dark => "☀️",
            Theme::Light => "🌙",
        }
    }

    pub fn toggle_title(&self) -> &'static str {
        match self {
            Theme::Dark => "Switch to light theme",
            Theme::Light => "Switch to dark theme",
        }
    }

    pub fn body_class(&self) -> &'static str {
        match self {
            Theme::Dark => "theme-dark",
            Theme::Light => "",
        }
    }
}

impl FromStr for Theme {
    type Err = ReleaseNotesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ReleaseNotesError::render(format!(
                "Unknown theme '{}' (expected 'light' or 'dark')",
                other
            ))),
        }
    }
}

/// Everything the page depends on besides the data itself
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub mode: ViewMode,
    /// Show only the release with this label (release view)
    pub selected_release: Option<String>,
    pub filter: TypeFilter,
    pub query: String,
    pub theme: Theme,
}

impl ViewState {
    /// Search query with surrounding whitespace removed
    pub fn query(&self) -> &str {
        self.query.trim()
    }

    /// Mode actually rendered: release view needs at least one group
    pub fn effective_mode(&self, groups: &[ReleaseGroup<'_>]) -> ViewMode {
        if groups.is_empty() {
            ViewMode::Commit
        } else {
            self.mode
        }
    }

    /// Whether `group` is shown in release view
    pub fn is_release_selected(&self, group: &ReleaseGroup<'_>) -> bool {
        self.selected_release
            .as_deref()
            .map_or(true, |label| group.label == label)
    }

    /// Groups shown in release view, in display order
    pub fn visible_groups<'g, 'a>(&self, groups: &'g [ReleaseGroup<'a>]) -> Vec<&'g ReleaseGroup<'a>> {
        groups.iter().filter(|g| self.is_release_selected(g)).collect()
    }
}
