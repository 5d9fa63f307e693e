use crate::domain::CommitType;

/// Map a conventional prefix to a commit type
fn type_from_prefix(prefix: &str) -> Option<CommitType> {
    match prefix {
        "feat" => Some(CommitType::Feat),
        "fix" => Some(CommitType::Fix),
        "docs" => Some(CommitType::Docs),
        "style" => Some(CommitType::Style),
        "refactor" => Some(CommitType::Refactor),
        "test" => Some(CommitType::Test),
        "perf" => Some(CommitType::Perf),
        "ci" | "build" | "ops" => Some(CommitType::Ops),
        "chore" => Some(CommitType::Chore),
        _ => None,
    }
}

/// Type part of a header prefix: `" Feat(api)! "` -> `"feat"`
fn header_type(prefix: &str) -> String {
    let prefix = prefix.trim().to_lowercase();
    let without_scope = match prefix.split_once('(') {
        Some((head, _)) => head,
        None => prefix.as_str(),
    };
    without_scope.trim_end_matches('!').trim().to_string()
}

/// Keyword rules applied to the lowercased first line, first match wins
const FIRST_LINE_RULES: &[(CommitType, &[&str])] = &[
    (
        CommitType::Fix,
        &[
            "fix",
            "bug",
            "hotfix",
            "patch",
            "resolve",
            "error",
            "erreur",
            "issue",
            "correction",
            "ajustement",
            "réparation",
            "bugfix",
        ],
    ),
    (CommitType::Docs, &["doc", "readme", "changelog"]),
    (
        CommitType::Feat,
        &["feat", "feature", "add ", "introduce", "implement", "new ", "ajout "],
    ),
    (CommitType::Style, &["style", "format", "prettier", "eslint"]),
    (CommitType::Refactor, &["refactor", "restructur", "reorganiz"]),
    (CommitType::Test, &["test", "testing", "spec", "coverage"]),
    (CommitType::Perf, &["perf", "performance", "optim", "faster"]),
    (
        CommitType::Ops,
        &[
            " ci ", "pipeline", "workflow", "action", "build", "compile", "bundle", "deploy",
        ],
    ),
    (
        CommitType::Chore,
        &[
            "update",
            "bump",
            "upgrade",
            "deps",
            "dependency",
            "cleanup",
            "chore",
        ],
    ),
];

const BODY_CHORE_KEYWORDS: &[&str] = &["dependency", "renovate", "bump"];

/// Classify a commit from its conventional prefix, then author and wording.
pub fn classify_commit(first_line: &str, author: &str, full_message: &str) -> CommitType {
    if let Some(commit_type) = first_line
        .split_once(':')
        .and_then(|(prefix, _)| type_from_prefix(&header_type(prefix)))
    {
        return commit_type;
    }

    let author = author.to_lowercase();
    if author.contains("renovate") || author.contains("dependabot") {
        return CommitType::Chore;
    }

    let first = first_line.to_lowercase();
    for (commit_type, keywords) in FIRST_LINE_RULES {
        if keywords.iter().any(|k| first.contains(k)) {
            return *commit_type;
        }
    }

    let full = full_message.to_lowercase();
    if BODY_CHORE_KEYWORDS.iter().any(|k| full.contains(k)) {
        return CommitType::Chore;
    }

    CommitType::Other
}
