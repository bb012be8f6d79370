//! Built-in rule families

pub mod export;
pub mod labor;
pub mod project;
pub mod qa;
pub mod takeoff;

use super::normalize;
use super::{CommandContext, RuleResult};

pub const OPEN_PROJECT_FIRST: &str = "Please open a project first.";

/// Digits with optional thousands separators and decimals
pub(crate) const NUMBER: &str = r"\d[\d,]*(?:\.\d+)?";

/// Missing-info result when no project is open
pub(crate) fn require_project(ctx: &CommandContext) -> Option<RuleResult> {
    if ctx.has_project() {
        None
    } else {
        Some(RuleResult::missing(OPEN_PROJECT_FIRST))
    }
}

/// Regex alternation of every number word, each ending on a word boundary
pub(crate) fn number_words_pattern() -> String {
    normalize::number_words()
        .map(|w| format!(r"{}\b", w))
        .collect::<Vec<_>>()
        .join("|")
}
