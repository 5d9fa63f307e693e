//! HTML fragments of the release notes page.

use crate::dates::format_timestamp;
use crate::domain::{count_by_type, Commit, ReleaseData, ReleaseGroup};
use crate::render::escape_html;
use crate::render::search::{highlight, matches_query, search_info, search_text};
use crate::render::state::{TypeFilter, ViewMode, ViewState};
use crate::render::timeline::{render_sparkline, render_timeline};
use std::fmt::Write;

/// Link target of a commit, `#` without a repository URL
fn commit_url(commit: &Commit, repo_url: &str) -> String {
    if repo_url.is_empty() {
        "#".to_string()
    } else {
        format!("{}/commit/{}", repo_url, commit.hash)
    }
}

/// One `<li class="commit-item">`
pub fn commit_item(commit: &Commit, repo_url: &str, state: &ViewState) -> String {
    let query = state.query();
    let type_key = commit.commit_type.key();
    let type_label = commit.commit_type.label();

    let mut classes = vec!["commit-item"];
    if commit.author.to_lowercase().contains("renovate") {
        classes.push("commit-renovate");
    }
    if commit.has_tags() {
        classes.push("has-tag");
    }
    if !state.filter.matches(commit) {
        classes.push("hidden");
    }
    if !matches_query(commit, query) {
        classes.push("search-hidden");
    }

    let tag_badges: String = commit
        .tags
        .iter()
        .map(|tag| {
            format!(
                r#"<span class="commit-tag" title="Git Tag: {}">{}</span>"#,
                escape_html(tag),
                highlight(tag, query)
            )
        })
        .collect();

    let hash = escape_html(&commit.hash);

    format!(
        r#"<li class="{classes}" data-commit-type="{type_key}" data-commit-hash="{hash}" data-search="{search}">
<div class="commit-header">
<div class="commit-header-left">
<a href="{url}" target="_blank" class="commit-hash" title="{hash}">{short}</a>
<span class="commit-type type-{type_key}" title="{type_label}">{type_text}</span>
{tag_badges}
</div>
<span class="commit-date">{date}</span>
</div>
<div class="commit-summary">{summary}</div>
<div class="commit-body collapsed">
<div class="commit-message">{message}</div>
<div class="commit-footer">
<span class="commit-author">by {author}</span>
<div class="commit-stats">
<span class="stat additions" title="Insertions">+{insertions}</span>
<span class="stat deletions" title="Deletions">-{deletions}</span>
<span class="stat" title="Files changed">📄 {files}</span>
</div>
</div>
</div>
</li>"#,
        classes = classes.join(" "),
        hash = hash,
        search = escape_html(&search_text(commit)),
        type_key = type_key,
        type_label = type_label,
        type_text = highlight(type_label, query),
        url = escape_html(&commit_url(commit, repo_url)),
        short = escape_html(&commit.short_hash),
        tag_badges = tag_badges,
        date = format_timestamp(commit.timestamp),
        summary = highlight(commit.summary(), query),
        message = highlight(&commit.message, query),
        author = highlight(&commit.author, query),
        insertions = commit.insertions,
        deletions = commit.deletions,
        files = commit.files_changed,
    )
}

fn commit_list<'c>(commits: impl IntoIterator<Item = &'c Commit>, repo_url: &str, state: &ViewState) -> String {
    let items: String = commits
        .into_iter()
        .map(|c| commit_item(c, repo_url, state))
        .collect();
    format!("<ul class=\"commit-list\">\n{}</ul>", items)
}

/// Flat list of every commit in document order
pub fn commit_view(data: &ReleaseData, state: &ViewState) -> String {
    if data.commits.is_empty() {
        return r#"<div class="empty-section">No commits found.</div>"#.to_string();
    }
    commit_list(&data.commits, &data.repository.url, state)
}

/// One `<div class="release-section">`
pub fn release_section(group: &ReleaseGroup<'_>, repo_url: &str, state: &ViewState) -> String {
    let query = state.query();
    let mut classes = vec!["release-section"];
    if group.is_virtual {
        classes.push("virtual-release");
    }
    if !state.is_release_selected(group) {
        classes.push("hidden");
    }
    if !query.is_empty() && !group.commits.iter().any(|c| matches_query(c, query)) {
        classes.push("search-hidden");
    }

    let category_badges: String = count_by_type(group.commits)
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(commit_type, count)| {
            format!(
                r#"<span class="release-category-badge {}">{} {}: {}</span>"#,
                commit_type.key(),
                commit_type.icon(),
                commit_type.label(),
                count
            )
        })
        .collect();

    let label = escape_html(&group.label);
    let icon = if group.is_virtual { "🚀" } else { "🏷️" };

    format!(
        r#"<div class="{}" data-release-tag="{}">
<div class="release-header">
<h2 class="release-title">{} {}</h2>
<div class="release-meta">
<span class="release-commit-count">📊 {} commits</span>
<span class="release-date-range">📅 {} to {}</span>
</div>
</div>
<div class="release-summary">{}</div>
{}
</div>"#,
        classes.join(" "),
        label,
        icon,
        label,
        group.count(),
        format_timestamp(group.start_timestamp),
        format_timestamp(group.end_timestamp),
        category_badges,
        commit_list(group.commits, repo_url, state)
    )
}

/// Every release section, with those outside the selected release hidden,
/// followed by the "No releases found." line shown when none is visible
pub fn release_view(groups: &[ReleaseGroup<'_>], repo_url: &str, state: &ViewState) -> String {
    let mut sections: Vec<String> = groups
        .iter()
        .map(|group| release_section(group, repo_url, state))
        .collect();

    let any_visible = groups.iter().any(|g| state.is_release_selected(g));
    sections.push(format!(
        r#"<div id="no-releases" class="empty-section{}">No releases found.</div>"#,
        if any_visible { " hidden" } else { "" }
    ));
    sections.join("\n")
}

/// Container for one view; the page carries both and shows one
pub fn view_panel(id: &str, visible: bool, inner: &str) -> String {
    format!(
        "<div id=\"{}\" class=\"view-panel{}\">\n{}\n</div>",
        id,
        if visible { "" } else { " hidden" },
        inner
    )
}

fn active(selected: bool) -> &'static str {
    if selected {
        " active"
    } else {
        ""
    }
}

/// Total card with sparkline, timeline, then one card per non-empty category
pub fn summary(commits: &[&Commit], filter: TypeFilter) -> String {
    let tagged = commits.iter().filter(|c| c.has_tags()).count();

    let tagged_line = if tagged > 0 {
        format!(
            r#"<div class="summary-sub"><span class="icon-tag">🏷</span><span class="number-small">{}</span><span class="label-small">Tagged</span></div>"#,
            tagged
        )
    } else {
        String::new()
    };

    let total_card = format!(
        r#"<div class="summary-card total{}" data-type="all">
<span class="icon">📊</span>
<div class="summary-numbers">
<div class="summary-main"><span class="number">{}</span><span class="label">Total Commits</span></div>
{}
</div>
{}
</div>"#,
        active(filter == TypeFilter::All),
        commits.len(),
        tagged_line,
        render_sparkline(commits)
    );

    let mut cards = String::new();
    if tagged > 0 {
        let _ = write!(
            cards,
            r#"<div class="summary-card tags{}" data-type="tags"><span class="icon">🏷️</span><span class="number">{}</span><span class="label">Tags</span></div>"#,
            active(filter == TypeFilter::Tags),
            tagged
        );
    }
    for (commit_type, count) in count_by_type(commits.iter().copied()) {
        if count == 0 {
            continue;
        }
        let _ = write!(
            cards,
            r#"<div class="summary-card {key}{active}" data-type="{key}"><span class="icon">{icon}</span><span class="number">{count}</span><span class="label">{label}</span></div>"#,
            key = commit_type.key(),
            active = active(filter == TypeFilter::Type(commit_type)),
            icon = commit_type.icon(),
            count = count,
            label = commit_type.label()
        );
    }

    let categories = if cards.is_empty() {
        String::new()
    } else {
        format!("<div class=\"summary-categories\">{}</div>", cards)
    };

    format!(
        "<div class=\"summary-top\">\n{}\n{}\n</div>\n{}",
        total_card,
        render_timeline(commits, filter),
        categories
    )
}

/// `Repository: <link> | Generated: <date>`
pub fn metadata(data: &ReleaseData) -> String {
    let name = escape_html(&data.repository.name);
    let repo = if data.repository.url.is_empty() {
        name
    } else {
        format!(
            r#"<a href="{}" target="_blank" class="repo-link">{}</a>"#,
            escape_html(&data.repository.url),
            name
        )
    };
    format!(
        "<strong>Repository:</strong> {} | <strong>Generated:</strong> {}",
        repo,
        escape_html(&data.generated_at)
    )
}

fn badge(id: &str, class: &str, count: usize, title: &str) -> String {
    let hidden = if count == 0 { " badge-hidden" } else { "" };
    format!(
        r#"<span id="{}" class="release-badge {}{}" title="{}">{}</span>"#,
        id, class, hidden, title, count
    )
}

/// Incoming and tagged release counts; zero counts are hidden
pub fn release_badges(groups: &[ReleaseGroup<'_>]) -> String {
    let incoming = groups.iter().filter(|g| g.is_virtual).count();
    let real = groups.len() - incoming;
    format!(
        "{}{}",
        badge("incoming-badge", "incoming", incoming, "Unreleased commits"),
        badge("real-release-badge", "real", real, "Tagged releases")
    )
}

/// Mode buttons and release selector, hidden without release groups
pub fn view_controls(groups: &[ReleaseGroup<'_>], state: &ViewState) -> String {
    if groups.is_empty() {
        return r#"<div id="view-controls" class="view-controls hidden"></div>"#.to_string();
    }

    let mode = state.effective_mode(groups);
    let selector_hidden = if mode == ViewMode::Commit { " hidden" } else { "" };

    let mut options = format!(
        r#"<option value=""{}>All releases</option>"#,
        if state.selected_release.is_none() { " selected" } else { "" }
    );
    for group in groups {
        let selected = state.selected_release.as_deref() == Some(group.label.as_str());
        let _ = write!(
            options,
            r#"<option value="{label}" class="{class}"{selected}>{label} ({count} commits)</option>"#,
            label = escape_html(&group.label),
            count = group.count(),
            class = if group.is_virtual { "option-incoming" } else { "option-real" },
            selected = if selected { " selected" } else { "" }
        );
    }

    format!(
        r#"<div id="view-controls" class="view-controls">
<button id="mode-commit" class="mode-button{}">By Commit</button>
<button id="mode-release" class="mode-button{}">By Release</button>
<div id="release-selector" class="release-selector{}"><select id="release-dropdown">{}</select></div>
</div>"#,
        active(mode == ViewMode::Commit),
        active(mode == ViewMode::Release),
        selector_hidden,
        options
    )
}

/// Search box prefilled with the query, plus the result line
pub fn search_box(commits: &[&Commit], state: &ViewState) -> String {
    let query = state.query();
    let container_hidden = if commits.is_empty() { " hidden" } else { "" };

    let (info, info_class) = if query.is_empty() {
        (String::new(), "")
    } else {
        let count = commits.iter().filter(|c| matches_query(c, query)).count();
        (search_info(count), if count > 0 { " has-results" } else { "" })
    };

    format!(
        r#"<div id="search-container" class="search-container{}">
<input type="search" id="search-input" class="search-input" placeholder="Search commits..." value="{}">
<button id="search-clear" class="search-clear{}" title="Clear search">✕</button>
<div id="search-info" class="search-info{}">{}</div>
</div>"#,
        container_hidden,
        escape_html(query),
        if query.is_empty() { "" } else { " visible" },
        info_class,
        info
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{parse_releases, CommitType, RepositoryInfo, TagPolicy};

    fn commit(hash: &str, timestamp: i64, message: &str, commit_type: CommitType, tags: &[&str]) -> Commit {
        Commit {
            hash: hash.to_string(),
            short_hash: hash.chars().take(7).collect(),
            author: "Jane".to_string(),
            email: None,
            timestamp,
            message: message.to_string(),
            message_short: None,
            commit_type,
            files_changed: 1,
            insertions: 4,
            deletions: 2,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_commit_item_escapes_and_links() {
        let c = commit("abcdef123", 0, "fix: <script>", CommitType::Fix, &["v1.0.0"]);
        let html = commit_item(&c, "https://h/o/r", &ViewState::default());

        assert!(html.contains("fix: &lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains(r#"href="https://h/o/r/commit/abcdef123""#));
        assert!(html.contains(r#"class="commit-item has-tag""#));
        assert!(html.contains(r#"<span class="commit-tag" title="Git Tag: v1.0.0">v1.0.0</span>"#));
    }

    #[test]
    fn test_commit_item_without_url_links_to_hash() {
        let c = commit("abcdef123", 0, "x", CommitType::Other, &[]);
        assert!(commit_item(&c, "", &ViewState::default()).contains(r##"href="#""##));
    }

    #[test]
    fn test_commit_item_filter_and_search_classes() {
        let c = commit("a", 0, "docs: readme", CommitType::Docs, &[]);
        let state = ViewState {
            filter: TypeFilter::Tags,
            query: "nomatch".to_string(),
            ..ViewState::default()
        };
        let html = commit_item(&c, "", &state);
        assert!(html.contains(r#"class="commit-item hidden search-hidden""#));
    }

    #[test]
    fn test_release_section_hidden_when_no_commit_matches() {
        let commits = vec![commit("a", 0, "feat: a", CommitType::Feat, &["v1.0.0"])];
        let groups = parse_releases(&commits, TagPolicy::SemverStrict);
        let state = ViewState {
            query: "zzz".to_string(),
            ..ViewState::default()
        };
        let html = release_section(&groups[0], "", &state);
        assert!(html.starts_with(r#"<div class="release-section search-hidden" data-release-tag="v1.0.0">"#));
        assert!(html.contains("✨ Features: 1"));
    }

    #[test]
    fn test_release_view_empty_message() {
        assert_eq!(
            release_view(&[], "", &ViewState::default()),
            r#"<div id="no-releases" class="empty-section">No releases found.</div>"#
        );
    }

    #[test]
    fn test_release_view_hides_unselected_sections() {
        let commits = vec![
            commit("a", 0, "feat: a", CommitType::Feat, &["v1.0.0"]),
            commit("b", 10, "fix: b", CommitType::Fix, &["v1.1.0"]),
        ];
        let groups = parse_releases(&commits, TagPolicy::SemverStrict);
        let state = ViewState {
            selected_release: Some("v1.0.0".to_string()),
            ..ViewState::default()
        };
        let html = release_view(&groups, "", &state);
        assert!(html.contains(r#"<div class="release-section" data-release-tag="v1.0.0">"#));
        assert!(html.contains(r#"<div class="release-section hidden" data-release-tag="v1.1.0">"#));
        assert!(html.contains(r#"class="empty-section hidden""#));
    }

    #[test]
    fn test_view_controls_options_show_counts() {
        let commits = vec![
            commit("a", 0, "x", CommitType::Other, &[]),
            commit("b", 1, "y", CommitType::Other, &["v1.0.0"]),
            commit("c", 2, "z", CommitType::Other, &[]),
        ];
        let groups = parse_releases(&commits, TagPolicy::SemverStrict);
        let html = view_controls(&groups, &ViewState::default());
        assert!(html.contains(r#"class="option-real">v1.0.0 (2 commits)</option>"#));
        assert!(html.contains(r#"class="option-incoming">Incoming (1 commits)</option>"#));
    }

    #[test]
    fn test_commit_item_carries_search_text() {
        let c = commit("abc", 0, "fix: Login <form>", CommitType::Fix, &["v2.0.0"]);
        let html = commit_item(&c, "", &ViewState::default());
        assert!(html.contains("data-search=\"fix: login &lt;form&gt;"));
        assert!(html.contains("v2.0.0\""));
    }

    #[test]
    fn test_summary_cards() {
        let commits = [
            commit("a", 0, "feat: a", CommitType::Feat, &["v1.0.0"]),
            commit("b", 10, "fix: b", CommitType::Fix, &[]),
        ];
        let refs: Vec<&Commit> = commits.iter().collect();
        let html = summary(&refs, TypeFilter::Type(CommitType::Fix));

        assert!(html.contains(r#"<div class="summary-card total" data-type="all">"#));
        assert!(html.contains(r#"data-type="tags""#));
        assert!(html.contains(r#"<div class="summary-card fix active" data-type="fix">"#));
        assert!(!html.contains(r#"data-type="docs""#));
        assert!(html.contains("Tagged"));
    }

    #[test]
    fn test_badges_hide_zero_counts() {
        let commits = vec![
            commit("a", 0, "x", CommitType::Other, &[]),
            commit("b", 1, "y", CommitType::Other, &["v1.0.0"]),
        ];
        let groups = parse_releases(&commits, TagPolicy::SemverStrict);
        let html = release_badges(&groups);
        assert!(html.contains(r#"class="release-badge incoming""#));
        assert!(html.contains(r#"class="release-badge real""#));

        let html = release_badges(&[]);
        assert!(html.contains("incoming badge-hidden"));
        assert!(html.contains("real badge-hidden"));
    }

    #[test]
    fn test_view_controls_hidden_without_groups() {
        assert!(view_controls(&[], &ViewState::default()).contains("view-controls hidden"));
    }

    #[test]
    fn test_metadata_escapes_name() {
        let data = ReleaseData {
            generated_at: "2024-01-01 00:00:00".to_string(),
            generated_at_iso: None,
            repository: RepositoryInfo {
                name: "a<b".to_string(),
                branch: "main".to_string(),
                url: String::new(),
            },
            commits: vec![],
        };
        assert_eq!(
            metadata(&data),
            "<strong>Repository:</strong> a&lt;b | <strong>Generated:</strong> 2024-01-01 00:00:00"
        );
    }

    #[test]
    fn test_search_box_counts_matches() {
        let commits = [
            commit("a", 0, "fix: login", CommitType::Fix, &[]),
            commit("b", 1, "feat: other", CommitType::Feat, &[]),
        ];
        let refs: Vec<&Commit> = commits.iter().collect();
        let state = ViewState {
            query: "login".to_string(),
            ..ViewState::default()
        };
        let html = search_box(&refs, &state);
        assert!(html.contains(r#"value="login""#));
        assert!(html.contains(r#"<div id="search-info" class="search-info has-results">Found 1 commit</div>"#));
    }
}
