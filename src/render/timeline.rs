//! Commit timeline and commits-per-day sparkline.
//!
//! Markers are positioned with `left-N` classes (N in 0..=100) instead of
//! inline styles so the page works under a `style-src 'self'` policy.

use crate::dates::{format_timestamp, long_date, short_date, utc_day};
use crate::domain::Commit;
use crate::render::escape_html;
use crate::render::state::TypeFilter;
use chrono::Days;
use std::collections::BTreeMap;
use std::fmt::Write;

const GRADUATIONS: i64 = 10;

const SPARK_WIDTH: f64 = 120.0;
const SPARK_HEIGHT: f64 = 36.0;
const SPARK_PADDING: f64 = 2.0;

/// Stylesheet rules for every `left-N` class
pub fn position_classes_css() -> String {
    (0..=100).fold(String::new(), |mut css, n| {
        let _ = writeln!(css, ".left-{n} {{ left: {n}%; }}");
        css
    })
}

fn time_bounds(commits: &[&Commit]) -> Option<(i64, i64)> {
    let oldest = commits.iter().map(|c| c.timestamp).min()?;
    let newest = commits.iter().map(|c| c.timestamp).max()?;
    Some((oldest, newest))
}

/// Seconds between the oldest and newest commit, at least 1
fn time_range(oldest: i64, newest: i64) -> i128 {
    (i128::from(newest) - i128::from(oldest)).max(1)
}

/// Percent position of `timestamp` on a track spanning `oldest..oldest+range`
pub fn position(timestamp: i64, oldest: i64, range: i128) -> i64 {
    let offset = i128::from(timestamp) - i128::from(oldest);
    ((offset as f64 / range as f64) * 100.0).round().clamp(0.0, 100.0) as i64
}

/// Timeline track, oldest commit on the left. Empty input renders nothing.
pub fn render_timeline(commits: &[&Commit], filter: TypeFilter) -> String {
    let Some((oldest, newest)) = time_bounds(commits) else {
        return String::new();
    };
    let range = time_range(oldest, newest);

    let mut markers = String::new();
    for commit in commits {
        let left = position(commit.timestamp, oldest, range);
        let date = format_timestamp(commit.timestamp);
        let summary = commit.summary();
        let hash = escape_html(&commit.hash);

        if commit.has_tags() {
            let title = format!("TAG: {} - {} ({})", commit.tags.join(", "), summary, date);
            let _ = write!(
                markers,
                r#"<div class="timeline-tag left-{}" title="{}" data-commit-hash="{}" data-is-tag="true"></div>"#,
                left,
                escape_html(&title),
                hash
            );
        } else {
            let hidden = if filter.matches(commit) { "" } else { " hidden" };
            let title = format!("{} ({})", summary, date);
            let _ = write!(
                markers,
                r#"<div class="timeline-commit type-{} left-{}{}" title="{}" data-commit-hash="{}"></div>"#,
                commit.commit_type.key(),
                left,
                hidden,
                escape_html(&title),
                hash
            );
        }
    }

    let mut graduations = String::new();
    for i in 0..=GRADUATIONS {
        let timestamp = oldest.saturating_add((range as f64 / GRADUATIONS as f64 * i as f64) as i64);
        let _ = write!(
            graduations,
            r#"<div class="timeline-graduation left-{}"><div class="graduation-tick"></div><div class="graduation-label">{}</div></div>"#,
            i * 100 / GRADUATIONS,
            short_date(timestamp)
        );
    }

    format!(
        r#"<div class="commit-timeline">
<div class="timeline-label">Commit Timeline</div>
<div class="timeline-track-container"><div class="timeline-track" id="timeline-track">
<div class="timeline-graduations">{}</div>
{}
</div></div>
<div class="timeline-dates"><span>{}</span><span>{}</span></div>
</div>"#,
        graduations,
        markers,
        long_date(oldest),
        long_date(newest)
    )
}

/// Commits per UTC day from the oldest to the newest commit's day, zeros included
pub fn daily_counts(commits: &[&Commit]) -> Vec<usize> {
    let Some((oldest, newest)) = time_bounds(commits) else {
        return Vec::new();
    };

    let mut by_day = BTreeMap::new();
    for commit in commits {
        *by_day.entry(utc_day(commit.timestamp)).or_insert(0usize) += 1;
    }

    let last = utc_day(newest);
    let mut day = utc_day(oldest);
    let mut counts = Vec::new();
    while day <= last {
        counts.push(by_day.get(&day).copied().unwrap_or(0));
        match day.checked_add_days(Days::new(1)) {
            Some(next) => day = next,
            None => break,
        }
    }
    counts
}

/// Polyline points for the sparkline, formatted `x,y` with two decimals
pub fn sparkline_points(counts: &[usize]) -> Vec<(f64, f64)> {
    let max = counts.iter().copied().max().unwrap_or(0).max(1) as f64;
    let y_of = |value: usize| {
        SPARK_HEIGHT - SPARK_PADDING - (value as f64 / max) * (SPARK_HEIGHT - SPARK_PADDING * 2.0)
    };

    match counts {
        [] => Vec::new(),
        [single] => {
            let y = y_of(*single);
            vec![(SPARK_PADDING, y), (SPARK_WIDTH - SPARK_PADDING, y)]
        }
        _ => {
            let step = (SPARK_WIDTH - SPARK_PADDING * 2.0) / (counts.len() - 1) as f64;
            counts
                .iter()
                .enumerate()
                .map(|(i, value)| (SPARK_PADDING + i as f64 * step, y_of(*value)))
                .collect()
        }
    }
}

/// Commits-per-day sparkline. Empty input renders nothing.
pub fn render_sparkline(commits: &[&Commit]) -> String {
    let Some((oldest, newest)) = time_bounds(commits) else {
        return String::new();
    };
    let counts = daily_counts(commits);
    let points = sparkline_points(&counts);
    let Some(&(last_x, _)) = points.last() else {
        return String::new();
    };

    let formatted: Vec<String> = points
        .iter()
        .map(|(x, y)| format!("{:.2},{:.2}", x, y))
        .collect();
    let baseline = SPARK_HEIGHT - SPARK_PADDING;
    let area = format!(
        "M {},{} L {} L {:.2},{} Z",
        SPARK_PADDING,
        baseline,
        formatted.join(" L "),
        last_x,
        baseline
    );
    let dots: String = points
        .iter()
        .map(|(x, y)| format!(r#"<circle class="sparkline-dot" cx="{:.2}" cy="{:.2}" r="1.5"></circle>"#, x, y))
        .collect();

    let days = counts.len();
    let total: usize = counts.iter().sum();
    let unit = if days == 1 { "day" } else { "days" };

    format!(
        r#"<div class="summary-sparkline">
<div class="sparkline-label">Commits per day ({} - {}, {} {})</div>
<svg viewBox="0 0 {} {}" preserveAspectRatio="none" role="img" aria-label="Sparkline showing {} commits over {} days">
<path class="sparkline-area" d="{}"></path>
<polyline class="sparkline-line" points="{}"></polyline>
{}
</svg>
</div>"#,
        short_date(oldest),
        long_date(newest),
        days,
        unit,
        SPARK_WIDTH,
        SPARK_HEIGHT,
        total,
        days,
        area,
        formatted.join(" "),
        dots
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CommitType;

    const DAY: i64 = 86_400;

    fn commit(timestamp: i64, tags: &[&str]) -> Commit {
        Commit {
            hash: format!("h{}", timestamp),
            short_hash: "h".to_string(),
            author: "a".to_string(),
            email: None,
            timestamp,
            message: "feat: \"quoted\"".to_string(),
            message_short: None,
            commit_type: CommitType::Feat,
            files_changed: 0,
            insertions: 0,
            deletions: 0,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_position_rounds_to_percent() {
        assert_eq!(position(0, 0, 3), 0);
        assert_eq!(position(1, 0, 3), 33);
        assert_eq!(position(2, 0, 3), 67);
        assert_eq!(position(3, 0, 3), 100);
    }

    #[test]
    fn test_timeline_markers_and_graduations() {
        let commits = [commit(0, &[]), commit(100, &["v1.0.0"])];
        let refs: Vec<&Commit> = commits.iter().collect();
        let html = render_timeline(&refs, TypeFilter::All);

        assert_eq!(html.matches("timeline-graduation ").count(), 11);
        assert!(html.contains(r#"class="timeline-commit type-feat left-0""#));
        assert!(html.contains(r#"class="timeline-tag left-100""#));
        assert!(html.contains("&quot;quoted&quot;"));
    }

    #[test]
    fn test_timeline_single_commit_uses_unit_range() {
        let commits = [commit(500, &[])];
        let refs: Vec<&Commit> = commits.iter().collect();
        assert!(render_timeline(&refs, TypeFilter::All).contains("left-0\""));
        assert_eq!(render_timeline(&[], TypeFilter::All), "");
    }

    #[test]
    fn test_filtered_out_dots_are_hidden() {
        let commits = [commit(0, &[])];
        let refs: Vec<&Commit> = commits.iter().collect();
        let html = render_timeline(&refs, TypeFilter::Type(CommitType::Fix));
        assert!(html.contains("left-0 hidden"));
    }

    #[test]
    fn test_extreme_timestamps_stay_on_track() {
        assert_eq!(position(i64::MAX, i64::MIN, time_range(i64::MIN, i64::MAX)), 100);
        assert_eq!(position(i64::MIN, i64::MIN, time_range(i64::MIN, i64::MAX)), 0);

        let commits = [commit(i64::MIN, &[]), commit(i64::MAX, &["v1.0.0"])];
        let refs: Vec<&Commit> = commits.iter().collect();
        let html = render_timeline(&refs, TypeFilter::All);
        assert!(html.contains("timeline-commit type-feat left-0"));
        assert!(html.contains("timeline-tag left-100"));
        assert_eq!(html.matches("timeline-graduation ").count(), 11);
        assert!(!render_sparkline(&refs).is_empty());
    }

    #[test]
    fn test_daily_counts_fill_gaps() {
        let commits = [commit(0, &[]), commit(10, &[]), commit(3 * DAY, &[])];
        let refs: Vec<&Commit> = commits.iter().collect();
        assert_eq!(daily_counts(&refs), vec![2, 0, 0, 1]);
    }

    #[test]
    fn test_single_day_is_flat_line_across_width() {
        let points = sparkline_points(&[3]);
        assert_eq!(points, vec![(2.0, 2.0), (118.0, 2.0)]);
    }

    #[test]
    fn test_sparkline_scales_to_max() {
        let points = sparkline_points(&[0, 2]);
        assert_eq!(points, vec![(2.0, 34.0), (118.0, 2.0)]);
    }

    #[test]
    fn test_sparkline_markup() {
        let commits = [commit(0, &[]), commit(DAY, &[])];
        let refs: Vec<&Commit> = commits.iter().collect();
        let html = render_sparkline(&refs);
        assert!(html.contains(r#"viewBox="0 0 120 36""#));
        assert!(html.contains(r#"points="2.00,2.00 118.00,2.00""#));
        assert!(html.contains("2 days"));
        assert_eq!(html.matches("sparkline-dot").count(), 2);
        assert_eq!(render_sparkline(&[]), "");
    }

    #[test]
    fn test_position_css_covers_all_classes() {
        let css = position_classes_css();
        assert!(css.contains(".left-0 { left: 0%; }"));
        assert!(css.contains(".left-100 { left: 100%; }"));
        assert_eq!(css.lines().count(), 101);
    }
}
