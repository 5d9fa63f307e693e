use crate::dates::format_timestamp;
use crate::domain::Commit;
use crate::render::escape_html;
use regex::RegexBuilder;

/// Lowercased text a query is matched against
pub fn search_text(commit: &Commit) -> String {
    let date = format_timestamp(commit.timestamp);
    let tags = commit.tags.join(" ");
    [
        commit.message.as_str(),
        commit.message_short.as_deref().unwrap_or(""),
        commit.author.as_str(),
        commit.commit_type.key(),
        date.as_str(),
        tags.as_str(),
    ]
    .join(" ")
    .to_lowercase()
}

/// Case-insensitive substring match. An empty query matches everything.
pub fn matches_query(commit: &Commit, query: &str) -> bool {
    let query = query.trim();
    query.is_empty() || search_text(commit).contains(&query.to_lowercase())
}

/// Escape `text` and wrap every occurrence of `query` in a highlight span
pub fn highlight(text: &str, query: &str) -> String {
    let query = query.trim();
    if query.is_empty() {
        return escape_html(text);
    }

    let Ok(pattern) = RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    else {
        return escape_html(text);
    };

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for found in pattern.find_iter(text) {
        out.push_str(&escape_html(&text[last..found.start()]));
        out.push_str("<span class=\"search-highlight\">");
        out.push_str(&escape_html(found.as_str()));
        out.push_str("</span>");
        last = found.end();
    }
    out.push_str(&escape_html(&text[last..]));
    out
}

/// Line shown under the search box
pub fn search_info(match_count: usize) -> String {
    match match_count {
        0 => "No commits found".to_string(),
        1 => "Found 1 commit".to_string(),
        n => format!("Found {} commits", n),
    }
}
