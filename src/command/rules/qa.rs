//! QA and help rules

use super::require_project;
use crate::command::{
    CommandContext, CommandRule, ParsedAction, RuleResult, PARSER_VERSION, SCHEMA_VERSION,
};
use regex::Regex;

pub fn rules() -> Vec<Box<dyn CommandRule>> {
    vec![Box::new(CapabilitiesRule::new()), Box::new(ShowIssuesRule::new())]
}

/// "help", "what can you do", "list commands"
pub struct CapabilitiesRule {
    detect_re: Regex,
}

impl CapabilitiesRule {
    pub fn new() -> Self {
        Self {
            detect_re: Regex::new(
                r"(?i)^\s*(?:help\b|what\s+can\s+(?:you|i)\s+do\b|(?:show|list)\s+(?:me\s+)?(?:the\s+|all\s+)?(?:commands|capabilities|help)\b)",
            )
            .unwrap(),
        }
    }
}

impl Default for CapabilitiesRule {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRule for CapabilitiesRule {
    fn id(&self) -> &str {
        "system.capabilities"
    }

    fn name(&self) -> &str {
        "List capabilities"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn examples(&self) -> &[&'static str] {
        &["What can you do?", "help", "list commands"]
    }

    fn detect(&self, text: &str, _ctx: &CommandContext) -> bool {
        self.detect_re.is_match(text)
    }

    fn parse(&self, _text: &str, _ctx: &CommandContext) -> RuleResult {
        RuleResult::action(
            ParsedAction::new("system.capabilities", 1.0)
                .with("parser_version", PARSER_VERSION)
                .with("schema_version", SCHEMA_VERSION),
        )
    }
}

/// Open the QA panel, optionally filtered by severity
pub struct ShowIssuesRule {
    detect_re: Regex,
    error_re: Regex,
    warning_re: Regex,
}

impl ShowIssuesRule {
    pub fn new() -> Self {
        Self {
            detect_re: Regex::new(
                r"(?i)\b(?:qa|issues?|problems|warnings|errors)\b|^\s*(?:check|review)\b",
            )
            .unwrap(),
            error_re: Regex::new(r"(?i)\b(?:errors?|critical|blocking)\b").unwrap(),
            warning_re: Regex::new(r"(?i)\bwarnings?\b").unwrap(),
        }
    }

    fn severity(&self, text: &str) -> &'static str {
        if self.error_re.is_match(text) {
            "error"
        } else if self.warning_re.is_match(text) {
            "warning"
        } else {
            "all"
        }
    }
}

impl Default for ShowIssuesRule {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRule for ShowIssuesRule {
    fn id(&self) -> &str {
        "qa.show_issues"
    }

    fn name(&self) -> &str {
        "Show QA issues"
    }

    fn priority(&self) -> i32 {
        60
    }

    fn examples(&self) -> &[&'static str] {
        &["Show QA issues", "Any errors?", "Check the estimate"]
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
        RuleResult::action(
            ParsedAction::new("qa.show_issues", 0.9).with("severity", self.severity(text)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_detect() {
        let rule = CapabilitiesRule::new();
        let ctx = CommandContext::default();
        assert!(rule.detect("What can you do?", &ctx));
        assert!(rule.detect("help", &ctx));
        assert!(rule.detect("show me the commands", &ctx));
        assert!(!rule.detect("helpful tips", &ctx));
        assert!(!rule.detect("add help desk 1 ea", &ctx));
    }

    #[test]
    fn test_capabilities_without_project() {
        let result = CapabilitiesRule::new().parse("help", &CommandContext::default());
        let action = &result.actions[0];
        assert_eq!(action.action_type, "system.capabilities");
        assert_eq!(action.confidence, 1.0);
        assert_eq!(action.param("parser_version").and_then(|v| v.as_str()), Some(PARSER_VERSION));
        assert_eq!(action.param("schema_version").and_then(|v| v.as_int()), Some(1));
    }

    #[test]
    fn test_issue_severity() {
        let rule = ShowIssuesRule::new();
        let ctx = CommandContext::with_project("p1");
        let severity = |text: &str| {
            rule.parse(text, &ctx).actions[0]
                .param("severity")
                .and_then(|v| v.as_str())
                .map(str::to_string)
        };
        assert_eq!(severity("show errors").as_deref(), Some("error"));
        assert_eq!(severity("any warnings?").as_deref(), Some("warning"));
        assert_eq!(severity("show qa issues").as_deref(), Some("all"));
        assert_eq!(severity("check the estimate").as_deref(), Some("all"));
    }

    #[test]
    fn test_issues_needs_project() {
        let rule = ShowIssuesRule::new();
        let result = rule.parse("show qa", &CommandContext::default());
        assert!(result.matched);
        assert!(result.missing_info.is_some());
    }
}
