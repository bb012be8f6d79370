//! Project lifecycle rules - create, defaults, plan viewer

use super::{number_words_pattern, require_project, NUMBER};
use crate::command::normalize::{capitalize_words, parse_number};
use crate::command::{CommandContext, CommandRule, ParsedAction, RuleResult};
use regex::Regex;
use std::sync::LazyLock;

/// "create project", "start a new project", "new project"
static CREATE_PROJECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:create|new|start|make)\s+(?:a\s+)?(?:new\s+)?project\b").unwrap()
});

/// Keywords that end a project name and begin a defaults clause
static DEFAULTS_KEYWORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:tax|markup|burden|waste|address)\b").unwrap());

/// Percent settings: keyword and the param it fills
const DEFAULT_KEYS: &[(&str, &str)] = &[
    ("tax", "tax_percent"),
    ("markup", "markup_percent"),
    ("burden", "labor_burden_percent"),
    ("waste", "waste_percent"),
];

/// One regex per percent keyword, capturing the value that follows it
static DEFAULT_VALUE_RES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    let words = number_words_pattern();
    DEFAULT_KEYS
        .iter()
        .map(|(keyword, param)| {
            let src = format!(
                r"(?i)\b{keyword}\b(?:\s*(?:rate|percent|percentage|pct|%|to|at|of|is|=|:))*\s*({NUMBER}|(?:{words})(?:[\s-]+(?:{words}))?)"
            );
            (*param, Regex::new(&src).unwrap())
        })
        .collect()
});

pub fn rules() -> Vec<Box<dyn CommandRule>> {
    vec![
        Box::new(CreateProjectRule),
        Box::new(SetupCompoundRule),
        Box::new(SetDefaultsRule),
        Box::new(OpenPlansRule::new()),
    ]
}

/// Name after "project": quoted names may hold any punctuation but quotes,
/// bare names run to the first `.`, `;` or `,`
static PROJECT_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bproject\s*(?:(?:called|named|for)\s+)?(?:["']([^"']*)["']?|([^.;,]*))"#)
        .unwrap()
});

/// Name of the project a create clause in `text` would make, cut at the
/// first defaults keyword
fn created_project_name(text: &str) -> Option<String> {
    let start = CREATE_PROJECT_RE.find(text)?.start();
    let caps = PROJECT_NAME_RE.captures(&text[start..])?;
    let raw = caps.get(1).or_else(|| caps.get(2))?.as_str();
    let raw = match DEFAULTS_KEYWORD_RE.find(raw) {
        Some(m) => &raw[..m.start()],
        None => raw,
    };
    let name = capitalize_words(raw.trim());
    (!name.is_empty()).then_some(name)
}

/// Create a project by name
pub struct CreateProjectRule;

impl CommandRule for CreateProjectRule {
    fn id(&self) -> &str {
        "project.create"
    }

    fn name(&self) -> &str {
        "Create project"
    }

    fn priority(&self) -> i32 {
        90
    }

    fn examples(&self) -> &[&'static str] {
        &[
            "Create project Smithfield Addition",
            "Start a new project called Oak Street Basement",
        ]
    }

    fn detect(&self, text: &str, _ctx: &CommandContext) -> bool {
        CREATE_PROJECT_RE.is_match(text)
    }

    fn parse(&self, text: &str, _ctx: &CommandContext) -> RuleResult {
        if !CREATE_PROJECT_RE.is_match(text) {
            return RuleResult::no_match();
        }

        match created_project_name(text) {
            Some(name) => {
                RuleResult::action(ParsedAction::new("project.create", 0.95).with("name", name))
            }
            None => RuleResult::missing("What should the new project be called?"),
        }
    }
}

/// "Create project X. Tax 7 markup 20" spans two rules
///
/// Claims the single-winner pass and declines, so the combined pass collects
/// `project.create` and `project.set_defaults` together.
pub struct SetupCompoundRule;

impl CommandRule for SetupCompoundRule {
    fn id(&self) -> &str {
        "project.setup_compound"
    }

    fn name(&self) -> &str {
        "Create project with defaults"
    }

    fn priority(&self) -> i32 {
        95
    }

    fn examples(&self) -> &[&'static str] {
        &["Create project Smithfield Addition. Tax 7 markup 20"]
    }

    fn detect(&self, text: &str, _ctx: &CommandContext) -> bool {
        created_project_name(text).is_some()
            && CREATE_PROJECT_RE
                .find(text)
                .is_some_and(|m| !extract_defaults(&text[m.end()..]).is_empty())
    }

    fn parse(&self, _text: &str, _ctx: &CommandContext) -> RuleResult {
        RuleResult::no_match()
    }
}

/// Tax, markup, labor burden and waste percentages
pub struct SetDefaultsRule;

/// Every percent setting found in `text`, in keyword order
fn extract_defaults(text: &str) -> Vec<(&'static str, f64)> {
    DEFAULT_VALUE_RES
        .iter()
        .filter_map(|(param, re)| {
            let raw = re.captures(text)?.get(1)?.as_str();
            let value = parse_number(raw).or_else(|| {
                // "twenty tax" style captures: fall back to the first word
                raw.split(|c: char| c.is_whitespace() || c == '-')
                    .next()
                    .and_then(parse_number)
            })?;
            Some((*param, value))
        })
        .collect()
}

impl CommandRule for SetDefaultsRule {
    fn id(&self) -> &str {
        "project.set_defaults"
    }

    fn name(&self) -> &str {
        "Set project defaults"
    }

    fn priority(&self) -> i32 {
        50
    }

    fn examples(&self) -> &[&'static str] {
        &["Set markup 20 tax 7 burden 35", "Waste ten percent"]
    }

    fn required_context(&self) -> &[&'static str] {
        &["project_id"]
    }

    fn detect(&self, text: &str, _ctx: &CommandContext) -> bool {
        DEFAULT_VALUE_RES.iter().any(|(_, re)| re.is_match(text))
    }

    fn parse(&self, text: &str, ctx: &CommandContext) -> RuleResult {
        let values = extract_defaults(text);
        if values.is_empty() {
            return RuleResult::no_match();
        }

        // Defaults in the same breath as a named "create project" target the new project
        if created_project_name(text).is_none() {
            if let Some(missing) = require_project(ctx) {
                return missing;
            }
        }

        let action = values
            .into_iter()
            .fold(ParsedAction::new("project.set_defaults", 0.9), |action, (param, value)| {
                action.with(param, value)
            });
        RuleResult::action(action)
    }
}

/// Open the plan viewer, optionally at a sheet
pub struct OpenPlansRule {
    detect_re: Regex,
    sheet_re: Regex,
}

impl OpenPlansRule {
    pub fn new() -> Self {
        Self {
            detect_re: Regex::new(
                r"(?i)\b(?:open|view|show|display|go\s+to)\s+(?:the\s+)?(?:plans?|sheets?|drawings?)\b",
            )
            .unwrap(),
            sheet_re: Regex::new(r"(?i)\bsheet\s+([a-z]{0,2}-?\d+(?:\.\d+)?)\b").unwrap(),
        }
    }
}

impl Default for OpenPlansRule {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRule for OpenPlansRule {
    fn id(&self) -> &str {
        "plans.open"
    }

    fn name(&self) -> &str {
        "Open plans"
    }

    fn priority(&self) -> i32 {
        55
    }

    fn examples(&self) -> &[&'static str] {
        &["Open plans", "View sheet A2.1"]
    }

    fn required_context(&self) -> &[&'static str] {
        &["project_id"]
    }

    fn detect(&self, text: &str, _ctx: &CommandContext) -> bool {
        self.detect_re.is_match(text)
    }

    fn parse(&self, text: &str, ctx: &CommandContext) -> RuleResult {
        if !self.detect_re.is_match(text) {
            return RuleResult::no_match();
        }
        if let Some(missing) = require_project(ctx) {
            return missing;
        }

        let sheet = self
            .sheet_re
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_uppercase());

        RuleResult::action(ParsedAction::new("plans.open", 0.8).with_opt("sheet", sheet))
    }
}
