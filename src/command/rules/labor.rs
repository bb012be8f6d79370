//! Labor rules - crew tasks and hourly rates

use super::{number_words_pattern, require_project, NUMBER};
use crate::command::normalize::{capitalize_words, infer_category, parse_number};
use crate::command::{CommandContext, CommandRule, ParsedAction, RuleResult};
use regex::Regex;

pub fn rules() -> Vec<Box<dyn CommandRule>> {
    vec![Box::new(AddTaskRule::new()), Box::new(SetRateRule::new())]
}

/// "add task <name> <hours> hours [at $<rate>/hr]"
pub struct AddTaskRule {
    detect_re: Regex,
    task_re: Regex,
}

impl AddTaskRule {
    pub fn new() -> Self {
        let words = number_words_pattern();
        Self {
            detect_re: Regex::new(r"(?i)^\s*add\b.*\b(?:task|tasks|labor|labour)\b").unwrap(),
            task_re: Regex::new(&format!(
                r"(?i)^add\s+(?:an?\s+)?(?:new\s+)?(?:labou?r\s+)?(?:task\s+)?(?:for\s+)?(?P<name>.+?)\s*[,:]?\s+(?P<hours>{NUMBER}|{words})\s*(?:hours?|hrs?|h)\b(?:\s*(?:at|@)\s*\$?\s*(?P<rate>{NUMBER})(?:\s*(?:/|per)\s*(?:hour|hr|h)\b)?)?"
            ))
            .unwrap(),
        }
    }
}

impl Default for AddTaskRule {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRule for AddTaskRule {
    fn id(&self) -> &str {
        "labor.add_task"
    }

    fn name(&self) -> &str {
        "Add labor task"
    }

    fn priority(&self) -> i32 {
        76
    }

    fn examples(&self) -> &[&'static str] {
        &[
            "Add task hang drywall 24 hours at $45/hr",
            "Add labor demo eight hours",
        ]
    }

    fn required_context(&self) -> &[&'static str] {
        &["project_id"]
    }

    fn detect(&self, text: &str, _ctx: &CommandContext) -> bool {
        self.detect_re.is_match(text)
    }

    fn parse(&self, text: &str, ctx: &CommandContext) -> RuleResult {
        let Some(caps) = self.task_re.captures(text) else {
            return RuleResult::no_match();
        };
        let Some(hours) = caps.name("hours").and_then(|m| parse_number(m.as_str())) else {
            return RuleResult::no_match();
        };
        let name = capitalize_words(caps.name("name").map_or("", |m| m.as_str()));
        if name.is_empty() {
            return RuleResult::missing("What should the labor task be called?");
        }

        if let Some(missing) = require_project(ctx) {
            return missing;
        }

        let rate = caps.name("rate").and_then(|m| parse_number(m.as_str()));
        RuleResult::action(
            ParsedAction::new("labor.add_task", 0.85)
                .with("trade", infer_category(&name))
                .with("name", name)
                .with("hours", hours)
                .with_opt("rate", rate),
        )
    }
}

/// "set labor rate [for <trade>] to $<rate>"
pub struct SetRateRule {
    detect_re: Regex,
    rate_re: Regex,
}

impl SetRateRule {
    pub fn new() -> Self {
        Self {
            detect_re: Regex::new(r"(?i)\blabou?r\s+rate\b").unwrap(),
            rate_re: Regex::new(&format!(
                r"(?i)\blabou?r\s+rate\s*(?:for\s+(?P<trade>[a-z ]+?)\s+)?(?:(?:to|at|is|of|=|:)\s*)?\$?\s*(?P<rate>{NUMBER})"
            ))
            .unwrap(),
        }
    }
}

impl Default for SetRateRule {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRule for SetRateRule {
    fn id(&self) -> &str {
        "labor.set_rate"
    }

    fn name(&self) -> &str {
        "Set labor rate"
    }

    fn priority(&self) -> i32 {
        74
    }

    fn examples(&self) -> &[&'static str] {
        &["Set labor rate to $55", "Labor rate for drywall $48/hr"]
    }

    fn required_context(&self) -> &[&'static str] {
        &["project_id"]
    }

    fn detect(&self, text: &str, _ctx: &CommandContext) -> bool {
        self.detect_re.is_match(text)
    }

    fn parse(&self, text: &str, ctx: &CommandContext) -> RuleResult {
        let Some(caps) = self.rate_re.captures(text) else {
            return RuleResult::no_match();
        };
        let Some(rate) = caps.name("rate").and_then(|m| parse_number(m.as_str())) else {
            return RuleResult::no_match();
        };

        if let Some(missing) = require_project(ctx) {
            return missing;
        }

        let trade = caps
            .name("trade")
            .map(|m| capitalize_words(m.as_str()))
            .filter(|t| !t.is_empty());
        RuleResult::action(
            ParsedAction::new("labor.set_rate", 0.85)
                .with("rate", rate)
                .with_opt("trade", trade),
        )
    }
}
