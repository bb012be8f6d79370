//! Takeoff rules - line items and assembly-driven drafts

use super::{require_project, NUMBER};
use crate::command::normalize::{
    capitalize_words, extract_assemblies, extract_variables, infer_category, infer_project_type,
    normalize_unit, parse_number, unit_pattern,
};
use crate::command::{CommandContext, CommandRule, ParsedAction, RuleResult};
use regex::{Captures, Regex};

/// Words the fallback unit capture may swallow that are never units
const NOT_UNITS: &[&str] = &["as", "at", "per", "for", "of", "draft", "drafts", "drafted"];

const DEFAULT_UNIT: &str = "EA";

pub fn rules() -> Vec<Box<dyn CommandRule>> {
    vec![
        Box::new(GenerateDraftsRule::new()),
        Box::new(DraftBatchRule::promote()),
        Box::new(DraftBatchRule::delete()),
        Box::new(AddItemRule::new()),
    ]
}

/// "add <description> <qty> <unit> at $<price>" and the quantity-first form
pub struct AddItemRule {
    detect_re: Regex,
    excluded_re: Regex,
    draft_re: Regex,
    description_first_re: Regex,
    quantity_first_re: Regex,
}

impl AddItemRule {
    pub fn new() -> Self {
        let units = unit_pattern();
        let price = r"(?:\s*(?:at|@)\s*\$?\s*(?P<price>\d[\d,]*(?:\.\d+)?)(?:\s*(?:/|per)\s*[a-z. ]+?)?)?";
        let tail = r"(?:\s*,?\s*(?:as\s+(?:an?\s+)?)?draft(?:s|ed)?)?\s*\.?\s*$";

        Self {
            detect_re: Regex::new(r"(?i)^\s*add\b").unwrap(),
            excluded_re: Regex::new(r"(?i)\b(?:task|tasks|labor|labour)\b").unwrap(),
            draft_re: Regex::new(r"(?i)\bdraft(?:s|ed)?\b").unwrap(),
            description_first_re: Regex::new(&format!(
                r"(?i)^add\s+(?:an?\s+)?(?:draft\s+)?(?P<desc>[^@$]+?)\s+(?P<qty>{NUMBER})\s*(?P<unit>(?:{units})\b|[a-z]+\b)?{price}{tail}"
            ))
            .unwrap(),
            quantity_first_re: Regex::new(&format!(
                r"(?i)^add\s+(?P<qty>{NUMBER})(?:\s*(?P<unit>(?:{units})\b))?\s+(?:of\s+)?(?:draft\s+)?(?P<desc>[^@$]+?){price}{tail}"
            ))
            .unwrap(),
        }
    }

    fn captures<'t>(&self, text: &'t str) -> Option<Captures<'t>> {
        self.quantity_first_re
            .captures(text)
            .or_else(|| self.description_first_re.captures(text))
    }

    fn build_action(&self, text: &str, caps: &Captures) -> Option<ParsedAction> {
        let quantity = parse_number(caps.name("qty")?.as_str())?;

        let description = self.draft_re.replace_all(caps.name("desc")?.as_str(), "");
        let description = capitalize_words(description.trim());
        if description.is_empty() {
            return None;
        }

        let unit = caps
            .name("unit")
            .map(|m| m.as_str())
            .filter(|u| !NOT_UNITS.contains(&u.to_lowercase().as_str()))
            .map(normalize_unit)
            .unwrap_or_else(|| DEFAULT_UNIT.to_string());

        let unit_cost = caps.name("price").and_then(|m| parse_number(m.as_str()));

        Some(
            ParsedAction::new("takeoff.add_item", 0.85)
                .with("category", infer_category(&description))
                .with("description", description)
                .with("quantity", quantity)
                .with("unit", unit)
                .with_opt("unit_cost", unit_cost)
                .with("draft", self.draft_re.is_match(text)),
        )
    }
}

impl Default for AddItemRule {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRule for AddItemRule {
    fn id(&self) -> &str {
        "takeoff.add_item"
    }

    fn name(&self) -> &str {
        "Add takeoff item"
    }

    fn priority(&self) -> i32 {
        70
    }

    fn examples(&self) -> &[&'static str] {
        &[
            "Add drywall 500 sf at $12.99",
            "Add 120 lf baseboard @ 2.15 as draft",
        ]
    }

    fn required_context(&self) -> &[&'static str] {
        &["project_id"]
    }

    fn detect(&self, text: &str, _ctx: &CommandContext) -> bool {
        self.detect_re.is_match(text) && !self.excluded_re.is_match(text)
    }

    fn parse(&self, text: &str, ctx: &CommandContext) -> RuleResult {
        let Some(action) = self
            .captures(text)
            .and_then(|caps| self.build_action(text, &caps))
        else {
            return RuleResult::no_match();
        };

        if let Some(missing) = require_project(ctx) {
            return missing;
        }
        RuleResult::action(action)
    }
}

/// "generate drafts using framing + drywall", optionally "<label>: generate ..."
pub struct GenerateDraftsRule {
    labeled_re: Regex,
    using_re: Regex,
    bare_re: Regex,
}

impl GenerateDraftsRule {
    pub fn new() -> Self {
        let target = r"generate\s+(?:the\s+)?(?:draft\s+)?(?:drafts?|takeoff|items?|scope)(?:\s+items?)?";
        let source = r"\s+(?:using|from|for|with)\s+(?P<assemblies>[^.;\n]+)";

        Self {
            labeled_re: Regex::new(&format!(
                r"(?i)^\s*(?P<label>[^:.;]+?)\s*:\s*{target}{source}"
            ))
            .unwrap(),
            using_re: Regex::new(&format!(r"(?i)\b{target}{source}")).unwrap(),
            bare_re: Regex::new(&format!(r"(?i)\b{target}\s*(?:[.;!?]|$)")).unwrap(),
        }
    }
}

impl Default for GenerateDraftsRule {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRule for GenerateDraftsRule {
    fn id(&self) -> &str {
        "takeoff.generate_drafts"
    }

    fn name(&self) -> &str {
        "Generate drafts from assemblies"
    }

    fn priority(&self) -> i32 {
        85
    }

    fn examples(&self) -> &[&'static str] {
        &[
            "Generate drafts using framing + drywall. 90 LF walls, 8 ft ceilings",
            "Basement: generate drafts from framing, insulation and drywall",
        ]
    }

    fn required_context(&self) -> &[&'static str] {
        &["project_id", "project_type"]
    }

    /// Only the shapes `parse` accepts, so "generate takeoff pdf" is left to export
    fn detect(&self, text: &str, _ctx: &CommandContext) -> bool {
        self.labeled_re.is_match(text) || self.using_re.is_match(text) || self.bare_re.is_match(text)
    }

    fn parse(&self, text: &str, ctx: &CommandContext) -> RuleResult {
        let (label, clause) = if let Some(caps) = self.labeled_re.captures(text) {
            (
                caps.name("label").map(|m| m.as_str().trim().to_string()),
                caps.name("assemblies").map_or("", |m| m.as_str()),
            )
        } else if let Some(caps) = self.using_re.captures(text) {
            (None, caps.name("assemblies").map_or("", |m| m.as_str()))
        } else if self.bare_re.is_match(text) {
            (None, "")
        } else {
            return RuleResult::no_match();
        };

        if let Some(missing) = require_project(ctx) {
            return missing;
        }

        let assemblies = extract_assemblies(clause);
        if assemblies.is_empty() {
            return RuleResult::missing(
                "Which assemblies should I use? (e.g. framing, drywall, electrical)",
            );
        }

        let project_type = ctx
            .project_type
            .clone()
            .unwrap_or_else(|| infer_project_type(text).to_string());

        RuleResult::action(
            ParsedAction::new("takeoff.generate_drafts_from_assemblies", 0.85)
                .with("assemblies", assemblies)
                .with("variables", extract_variables(text))
                .with("project_type", project_type)
                .with_opt("label", label),
        )
    }
}

/// Promote or delete drafts in bulk
pub struct DraftBatchRule {
    id: &'static str,
    name: &'static str,
    action: &'static str,
    examples: &'static [&'static str],
    verb_re: Regex,
    shape_re: Regex,
    drafts_re: Regex,
    all_re: Regex,
}

impl DraftBatchRule {
    fn with_verbs(
        id: &'static str,
        name: &'static str,
        action: &'static str,
        examples: &'static [&'static str],
        verbs: &str,
    ) -> Self {
        Self {
            id,
            name,
            action,
            examples,
            verb_re: Regex::new(&format!(r"(?i)\b(?:{verbs})\b")).unwrap(),
            shape_re: Regex::new(&format!(
                r"(?i)\b(?:{verbs})\s+(?:(?:all|every|the|my|selected|of|current)\s+)*drafts?\b"
            ))
            .unwrap(),
            drafts_re: Regex::new(r"(?i)\bdrafts?\b").unwrap(),
            all_re: Regex::new(r"(?i)\b(?:all|every)\b").unwrap(),
        }
    }

    pub fn promote() -> Self {
        Self::with_verbs(
            "takeoff.promote_drafts",
            "Promote drafts",
            "takeoff.promote_drafts",
            &["Promote all drafts", "Finalize selected drafts"],
            "promote|finalize|approve|accept|commit|confirm",
        )
    }

    pub fn delete() -> Self {
        Self::with_verbs(
            "takeoff.delete_drafts",
            "Delete drafts",
            "takeoff.delete_drafts",
            &["Delete all drafts", "Discard selected drafts"],
            "delete|remove|clear|discard|drop",
        )
    }
}

impl CommandRule for DraftBatchRule {
    fn id(&self) -> &str {
        self.id
    }

    fn name(&self) -> &str {
        self.name
    }

    fn priority(&self) -> i32 {
        80
    }

    fn examples(&self) -> &[&'static str] {
        self.examples
    }

    fn required_context(&self) -> &[&'static str] {
        &["project_id"]
    }

    fn detect(&self, text: &str, _ctx: &CommandContext) -> bool {
        self.verb_re.is_match(text) && self.drafts_re.is_match(text)
    }

    fn parse(&self, text: &str, ctx: &CommandContext) -> RuleResult {
        if !self.shape_re.is_match(text) {
            return RuleResult::no_match();
        }
        if let Some(missing) = require_project(ctx) {
            return missing;
        }

        let scope = if self.all_re.is_match(text) {
            "all"
        } else {
            "selected"
        };
        RuleResult::action(ParsedAction::new(self.action, 0.9).with("scope", scope))
    }
}
