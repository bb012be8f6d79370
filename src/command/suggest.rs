//! Suggestion heuristic - example commands offered when nothing matched
//!
//! A fixed battery of keyword checks runs in order against the lowercased
//! input; each hit contributes its examples. The output is deterministic.

use super::Suggestion;
use regex::Regex;
use std::sync::LazyLock;

pub const NOT_UNDERSTOOD: &str = "I didn't understand that command. Try one of these:";

const MAX_SUGGESTIONS: usize = 5;

/// Suggestions plus the message shown with them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestions {
    pub message: String,
    pub suggestions: Vec<Suggestion>,
}

struct KeywordCheck {
    pattern: Regex,
    examples: &'static [(&'static str, &'static str)],
}

static CHECKS: LazyLock<Vec<KeywordCheck>> = LazyLock::new(|| {
    let check = |pattern: &str, examples: &'static [(&'static str, &'static str)]| KeywordCheck {
        pattern: Regex::new(pattern).unwrap(),
        examples,
    };
    vec![
        check(
            r"\b(export|pdf|csv|download|save)\b",
            &[
                ("Export a PDF estimate", "Export pdf"),
                ("Export the takeoff as CSV", "Export takeoff csv"),
            ],
        ),
        check(
            r"\b(markup|tax|burden|percent)\b|%",
            &[("Set project defaults", "Set markup 20 tax 7 burden 35")],
        ),
        check(
            r"\b(drafts?|promote|finalize)\b",
            &[
                ("Promote every draft", "Promote all drafts"),
                ("Discard drafts", "Delete all drafts"),
            ],
        ),
        check(
            r"\b(drywall|sheetrock|framing|studs?|insulation|paint|flooring|trim|doors?|windows?|electrical|plumbing|lumber)\b",
            &[("Add a takeoff item", "Add drywall 500 sf at $12.99")],
        ),
        check(
            r"\b(generate|assembly|assemblies)\b",
            &[(
                "Generate drafts from assemblies",
                "Generate drafts using framing + drywall",
            )],
        ),
        check(
            r"\b(qa|issues?|check|review)\b",
            &[("Show QA issues", "Show issues")],
        ),
        check(
            r"\b(plans?|open|view|sheets?)\b",
            &[("Open the plan viewer", "Open plans")],
        ),
        check(
            r"\b(create|project|new)\b",
            &[("Start a project", "Create project Smithfield Addition")],
        ),
    ]
});

const DEFAULT_SUGGESTIONS: &[(&str, &str)] = &[
    ("See what I can do", "What can you do"),
    ("Start a project", "Create project Smithfield Addition"),
    ("Add a takeoff item", "Add drywall 500 sf at $12.99"),
    ("Set project defaults", "Set markup 20 tax 7 burden 35"),
    ("Export a PDF estimate", "Export pdf"),
];

fn to_suggestions(
    pairs: &'static [(&'static str, &'static str)],
) -> impl Iterator<Item = Suggestion> {
    pairs
        .iter()
        .map(|(label, command)| Suggestion::new(label, command))
}

/// Build up to five example commands relevant to `text`
pub fn suggest(text: &str) -> Suggestions {
    let lower = text.to_lowercase();

    let mut suggestions: Vec<Suggestion> = CHECKS
        .iter()
        .filter(|check| check.pattern.is_match(&lower))
        .flat_map(|check| to_suggestions(check.examples))
        .collect();

    if suggestions.is_empty() {
        suggestions = to_suggestions(DEFAULT_SUGGESTIONS).collect();
    }
    suggestions.truncate(MAX_SUGGESTIONS);

    Suggestions {
        message: NOT_UNDERSTOOD.to_string(),
        suggestions,
    }
}
