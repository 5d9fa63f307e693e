//! Static HTML rendering of release notes.
//!
//! Every function here is a pure mapping from the release document, its
//! release groups and a [ViewState] to markup. [write_site] is the only
//! function touching the filesystem.

pub mod html;
pub mod search;
pub mod state;
pub mod timeline;

pub use state::{Theme, TypeFilter, ViewMode, ViewState};

use crate::domain::{Commit, ReleaseData, ReleaseGroup};
use crate::error::{ReleaseNotesError, Result};
use crate::export::write_release_data;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const PAGE_TEMPLATE: &str = include_str!("../../static/index_template.html");
const STYLE_CSS: &str = include_str!("../../static/style.css");
const PAGE_JS: &str = include_str!("../../static/page.js");

pub const INDEX_FILE: &str = "index.html";
pub const STYLE_FILE: &str = "style.css";
pub const SCRIPT_FILE: &str = "page.js";
pub const DATA_FILE: &str = "release_notes.json";

/// Escape text for HTML content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Replace `{{key}}` placeholders in a single pass
///
/// Inserted values are never scanned again, so user text that happens to
/// look like a placeholder stays as written. Unknown keys are kept.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = after[..end].trim();
                match values.iter().find(|(k, _)| *k == key) {
                    Some((_, value)) => out.push_str(value),
                    None => out.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Render the whole page for one view state
pub fn render_page(data: &ReleaseData, groups: &[ReleaseGroup<'_>], state: &ViewState) -> String {
    let repo_url = &data.repository.url;
    let mode = state.effective_mode(groups);

    let in_view: Vec<&Commit> = match mode {
        ViewMode::Commit => data.commits.iter().collect(),
        ViewMode::Release => state
            .visible_groups(groups)
            .into_iter()
            .flat_map(|g| g.commits.iter())
            .collect(),
    };

    // Both views are on the page so the script can switch between them.
    let mut content = html::view_panel(
        "commit-view",
        mode == ViewMode::Commit,
        &html::commit_view(data, state),
    );
    if !groups.is_empty() {
        content.push('\n');
        content.push_str(&html::view_panel(
            "release-view",
            mode == ViewMode::Release,
            &html::release_view(groups, repo_url, state),
        ));
    }

    let title = escape_html(&format!("{} - Release Notes", data.repository.name));
    let metadata = html::metadata(data);
    let badges = html::release_badges(groups);
    let controls = html::view_controls(groups, state);
    let search = html::search_box(&in_view, state);
    let summary = html::summary(&in_view, state.filter);

    fill_template(
        PAGE_TEMPLATE,
        &[
            ("title", title.as_str()),
            ("theme_class", state.theme.body_class()),
            ("theme_toggle_label", state.theme.toggle_label()),
            ("theme_toggle_title", state.theme.toggle_title()),
            ("metadata", metadata.as_str()),
            ("release_badges", badges.as_str()),
            ("view_controls", controls.as_str()),
            ("search", search.as_str()),
            ("summary", summary.as_str()),
            ("content", content.as_str()),
        ],
    )
}

/// Stylesheet written next to the page
pub fn stylesheet() -> String {
    format!("{}\n{}", STYLE_CSS, timeline::position_classes_css())
}

/// Script driving theme, search, view modes, release selection and filters
pub fn script() -> &'static str {
    PAGE_JS
}

/// Write `index.html`, `style.css`, `page.js` and optionally a copy of the
/// release document into `out_dir`. Returns the paths written.
///
/// The page is rendered before anything is written, so a rendering problem
/// leaves `out_dir` untouched.
pub fn write_site<P: AsRef<Path>>(
    out_dir: P,
    data: &ReleaseData,
    groups: &[ReleaseGroup<'_>],
    state: &ViewState,
    copy_data: bool,
) -> Result<Vec<PathBuf>> {
    let out_dir = out_dir.as_ref();
    let page = render_page(data, groups, state);
    let css = stylesheet();

    fs::create_dir_all(out_dir).map_err(|e| {
        ReleaseNotesError::render(format!(
            "Cannot create output directory {}: {}",
            out_dir.display(),
            e
        ))
    })?;

    let mut written = Vec::new();
    for (name, content) in [(INDEX_FILE, page.as_str()), (STYLE_FILE, css.as_str()), (SCRIPT_FILE, PAGE_JS)] {
        let path = out_dir.join(name);
        fs::write(&path, content)?;
        written.push(path);
    }

    if copy_data {
        let path = out_dir.join(DATA_FILE);
        write_release_data(&path, data)?;
        written.push(path);
    }

    info!(out_dir = %out_dir.display(), files = written.len(), "wrote site");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_fill_template_single_pass() {
        let out = fill_template(
            "<h1>{{title}}</h1><p>{{ body }}</p>{{unknown}}",
            &[("title", "{{body}}"), ("body", "text")],
        );
        assert_eq!(out, "<h1>{{body}}</h1><p>text</p>{{unknown}}");
    }

    #[test]
    fn test_fill_template_unclosed_placeholder() {
        assert_eq!(fill_template("a {{b", &[("b", "x")]), "a {{b");
    }

    #[test]
    fn test_template_has_every_placeholder() {
        for key in [
            "title",
            "theme_class",
            "theme_toggle_label",
            "theme_toggle_title",
            "metadata",
            "release_badges",
            "view_controls",
            "search",
            "summary",
            "content",
        ] {
            assert!(
                PAGE_TEMPLATE.contains(&format!("{{{{{}}}}}", key)),
                "missing placeholder {}",
                key
            );
        }
    }
}
