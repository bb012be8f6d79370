//! Rule registry - the priority-ordered set of command rules

use super::rules;
use super::{CommandContext, RuleResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

/// Trait for command rules
///
/// `detect` is a cheap shape check; `parse` does the real extraction and must
/// validate on its own, since `detect` may accept more than `parse` does.
pub trait CommandRule: Send + Sync {
    /// Unique id, e.g. `takeoff.add_item`
    fn id(&self) -> &str;

    /// Display name for help text
    fn name(&self) -> &str;

    /// Higher runs first
    fn priority(&self) -> i32;

    /// Sample commands for help text
    fn examples(&self) -> &[&'static str];

    /// Context fields the rule needs (documentation only)
    fn required_context(&self) -> &[&'static str] {
        &[]
    }

    fn detect(&self, text: &str, ctx: &CommandContext) -> bool;

    fn parse(&self, text: &str, ctx: &CommandContext) -> RuleResult;
}

/// Errors found when validating a registry
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate rule id: {0}")]
    DuplicateId(String),
}

/// Help entry for one rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCapability {
    pub id: String,
    pub name: String,
    pub examples: Vec<String>,
}

/// What the parser can do, for building help text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub rules: Vec<RuleCapability>,
}

/// Immutable, priority-sorted rule list
pub struct RuleRegistry {
    rules: Vec<Box<dyn CommandRule>>,
}

impl RuleRegistry {
    /// Flatten rule families and sort by descending priority
    ///
    /// The sort is stable, so equal priorities keep registration order.
    pub fn new(families: Vec<Vec<Box<dyn CommandRule>>>) -> Self {
        let mut rules: Vec<Box<dyn CommandRule>> = families.into_iter().flatten().collect();
        rules.sort_by_key(|rule| std::cmp::Reverse(rule.priority()));
        Self { rules }
    }

    /// Registry with every built-in rule family
    pub fn with_default_rules() -> Self {
        Self::new(vec![
            rules::project::rules(),
            rules::takeoff::rules(),
            rules::export::rules(),
            rules::qa::rules(),
            rules::labor::rules(),
        ])
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> impl Iterator<Item = &dyn CommandRule> {
        self.rules.iter().map(|rule| rule.as_ref())
    }

    /// Get rule by id
    pub fn get(&self, id: &str) -> Option<&dyn CommandRule> {
        self.rules().find(|rule| rule.id() == id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Check that no two rules share an id
    pub fn check_unique_ids(&self) -> Result<(), RegistryError> {
        let mut seen = HashSet::new();
        for rule in self.rules() {
            if !seen.insert(rule.id()) {
                return Err(RegistryError::DuplicateId(rule.id().to_string()));
            }
        }
        Ok(())
    }

    /// Id, name and examples of every rule
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            rules: self
                .rules()
                .map(|rule| RuleCapability {
                    id: rule.id().to_string(),
                    name: rule.name().to_string(),
                    examples: rule.examples().iter().map(|e| e.to_string()).collect(),
                })
                .collect(),
        }
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules().map(|rule| (rule.id(), rule.priority())))
            .finish()
    }
}

static DEFAULT_REGISTRY: LazyLock<RuleRegistry> = LazyLock::new(RuleRegistry::with_default_rules);

/// Process-wide registry with the built-in rules, built on first use
pub fn default_registry() -> &'static RuleRegistry {
    &DEFAULT_REGISTRY
}

/// Capabilities of the default registry
pub fn get_capabilities() -> Capabilities {
    default_registry().capabilities()
}
