//! Parse orchestrator - single-winner pass, combined pass, then suggestions

use super::registry::{default_registry, RuleRegistry};
use super::suggest;
use super::{CommandContext, ParseResult};

pub const EMPTY_COMMAND: &str = "Empty command";

/// Parse a command against the built-in rules
pub fn parse_command(command: &str, ctx: &CommandContext) -> ParseResult {
    default_registry().parse(command, ctx)
}

impl RuleRegistry {
    /// Turn one command into exactly one `ParseResult`
    pub fn parse(&self, command: &str, ctx: &CommandContext) -> ParseResult {
        let text = command.trim();
        if text.is_empty() {
            return ParseResult::error(EMPTY_COMMAND);
        }

        if let Some(result) = self.single_winner(text, ctx) {
            return result;
        }

        let combined = self.combined(text, ctx);
        if !combined.is_empty() {
            log::debug!("Combined pass produced {} action(s)", combined.len());
            return ParseResult::from_actions(combined);
        }

        let suggestions = suggest::suggest(text);
        log::debug!(
            "No rule matched {:?}, offering {} suggestion(s)",
            text,
            suggestions.suggestions.len()
        );
        ParseResult::not_understood(suggestions.message, suggestions.suggestions)
    }

    /// Only the first detecting rule is parsed; `None` when nothing detects
    /// or that rule declines the match
    fn single_winner(&self, text: &str, ctx: &CommandContext) -> Option<ParseResult> {
        let rule = self.rules().find(|rule| rule.detect(text, ctx))?;
        log::trace!("Rule {} detected {:?}", rule.id(), text);

        let result = rule.parse(text, ctx);
        if !result.matched {
            log::debug!("Rule {} detected but declined {:?}", rule.id(), text);
            return None;
        }

        if let Some(question) = result.missing_info {
            log::debug!("Rule {} needs more info: {}", rule.id(), question);
            return Some(ParseResult::missing_info(question));
        }

        log::debug!("Rule {} produced {} action(s)", rule.id(), result.actions.len());
        Some(ParseResult::from_actions(result.actions))
    }

    /// Every rule that fully matches contributes its actions, in priority order
    fn combined(&self, text: &str, ctx: &CommandContext) -> Vec<super::ParsedAction> {
        self.rules()
            .filter(|rule| rule.detect(text, ctx))
            .map(|rule| (rule.id(), rule.parse(text, ctx)))
            .filter(|(_, result)| result.matched && !result.actions.is_empty())
            .flat_map(|(id, result)| {
                log::trace!("Combined pass: {} contributed {}", id, result.actions.len());
                result.actions
            })
            .collect()
    }
}
