//! Export rules - PDF documents and CSV tables

use super::require_project;
use crate::command::{CommandContext, CommandRule, ParsedAction, RuleResult};
use regex::Regex;

pub fn rules() -> Vec<Box<dyn CommandRule>> {
    vec![Box::new(PdfRule::new()), Box::new(CsvRule::new())]
}

/// CSV table keywords and the `which` value they select
const CSV_TABLES: &[(&str, &str)] = &[
    ("labor", "labor"),
    ("labour", "labor"),
    ("rfi", "rfis"),
    ("assumption", "assumptions"),
    ("checklist", "checklist"),
];

const DEFAULT_CSV_TABLE: &str = "takeoff";

pub struct PdfRule {
    detect_re: Regex,
    template_re: Regex,
}

impl PdfRule {
    pub fn new() -> Self {
        Self {
            detect_re: Regex::new(
                r"(?i)\b(?:export|download|save|generate|create|print|make)\b.*\bpdf\b",
            )
            .unwrap(),
            template_re: Regex::new(r"(?i)\b(proposal|summary|estimate)\b").unwrap(),
        }
    }
}

impl Default for PdfRule {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRule for PdfRule {
    fn id(&self) -> &str {
        "export.pdf"
    }

    fn name(&self) -> &str {
        "Export PDF"
    }

    fn priority(&self) -> i32 {
        65
    }

    fn examples(&self) -> &[&'static str] {
        &["Export proposal PDF", "Download the summary as pdf"]
    }

    fn required_context(&self) -> &[&'static str] {
        &["project_id"]
    }

    fn detect(&self, text: &str, _ctx: &CommandContext) -> bool {
        self.detect_re.is_match(text)
    }

    fn parse(&self, text: &str, ctx: &CommandContext) -> RuleResult {
        if let Some(missing) = require_project(ctx) {
            return missing;
        }

        let template = self
            .template_re
            .captures(text)
            .and_then(|c| c.get(1))
            .map_or("estimate".to_string(), |m| m.as_str().to_lowercase());
        RuleResult::action(ParsedAction::new("export.pdf", 0.95).with("template", template))
    }
}

pub struct CsvRule {
    detect_re: Regex,
}

impl CsvRule {
    pub fn new() -> Self {
        Self {
            detect_re: Regex::new(r"(?i)\b(?:export|download|save)\b.*\bcsv\b|\bcsv\b.*\b(?:export|download)\b")
                .unwrap(),
        }
    }

    fn table(text: &str) -> &'static str {
        let lower = text.to_lowercase();
        CSV_TABLES
            .iter()
            .find(|(keyword, _)| lower.contains(keyword))
            .map_or(DEFAULT_CSV_TABLE, |(_, which)| *which)
    }
}

impl Default for CsvRule {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRule for CsvRule {
    fn id(&self) -> &str {
        "export.csv"
    }

    fn name(&self) -> &str {
        "Export CSV"
    }

    fn priority(&self) -> i32 {
        64
    }

    fn examples(&self) -> &[&'static str] {
        &["Export takeoff CSV", "Download labor csv"]
    }

    fn required_context(&self) -> &[&'static str] {
        &["project_id"]
    }

    fn detect(&self, text: &str, _ctx: &CommandContext) -> bool {
        self.detect_re.is_match(text)
    }

    fn parse(&self, text: &str, ctx: &CommandContext) -> RuleResult {
        if let Some(missing) = require_project(ctx) {
            return missing;
        }
        RuleResult::action(ParsedAction::new("export.csv", 0.95).with("which", Self::table(text)))
    }
}
