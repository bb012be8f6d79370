//! Command layer - turns short estimating sentences into typed actions
//!
//! ```text
//! "Add drywall 1050 sf at $12.99"
//!     -> takeoff.add_item { description: "Drywall", quantity: 1050, unit: "SF", ... }
//! ```

pub mod normalize;
pub mod parser;
pub mod registry;
pub mod rules;
pub mod suggest;

pub use parser::parse_command;
pub use registry::{
    default_registry, get_capabilities, Capabilities, CommandRule, RegistryError, RuleCapability,
    RuleRegistry,
};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bumped on breaking changes to the action shape or taxonomy
pub const SCHEMA_VERSION: u32 = 1;

/// Bumped on any change to detection or extraction behavior
pub const PARSER_VERSION: &str = "1.0.0";

/// What is currently open on the caller's side
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandContext {
    pub project_id: Option<String>,
    pub project_type: Option<String>,
}

impl CommandContext {
    /// Context with an open project
    pub fn with_project(project_id: impl Into<String>) -> Self {
        Self {
            project_id: Some(project_id.into()),
            project_type: None,
        }
    }

    pub fn project_type(mut self, project_type: impl Into<String>) -> Self {
        self.project_type = Some(project_type.into());
        self
    }

    pub fn has_project(&self) -> bool {
        self.project_id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

/// Action parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<ParamValue>),
    Map(BTreeMap<String, ParamValue>),
}

impl ParamValue {
    /// Store a number, keeping integral values as `Int`
    pub fn number(value: f64) -> Self {
        if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
            ParamValue::Int(value as i64)
        } else {
            ParamValue::Float(value)
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => Some(*v),
            ParamValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            ParamValue::Float(v) => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ParamValue]> {
        match self {
            ParamValue::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, ParamValue>> {
        match self {
            ParamValue::Map(v) => Some(v),
            _ => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::number(v)
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(v: Vec<String>) -> Self {
        ParamValue::List(v.into_iter().map(ParamValue::Text).collect())
    }
}

impl From<BTreeMap<String, f64>> for ParamValue {
    fn from(v: BTreeMap<String, f64>) -> Self {
        ParamValue::Map(v.into_iter().map(|(k, n)| (k, ParamValue::number(n))).collect())
    }
}

/// One proposed action for the executor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedAction {
    /// Dotted namespace, e.g. `takeoff.add_item`
    #[serde(rename = "type")]
    pub action_type: String,
    pub params: BTreeMap<String, ParamValue>,
    /// 0.0 - 1.0
    pub confidence: f64,
}

impl ParsedAction {
    pub fn new(action_type: impl Into<String>, confidence: f64) -> Self {
        Self {
            action_type: action_type.into(),
            params: BTreeMap::new(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// Builder-style param insertion
    pub fn with(mut self, key: &str, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    /// Insert only when a value is present
    pub fn with_opt<V: Into<ParamValue>>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.params.insert(key.to_string(), value.into());
        }
        self
    }

    pub fn param(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key)
    }
}

/// Outcome of a single rule's parse
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleResult {
    /// The utterance had this rule's shape, even if nothing could be extracted
    pub matched: bool,
    pub actions: Vec<ParsedAction>,
    /// Clarifying question when the shape matched but a required value is absent
    pub missing_info: Option<String>,
    /// Reserved for conversational continuation
    pub follow_up: Option<String>,
}

impl RuleResult {
    pub fn no_match() -> Self {
        Self::default()
    }

    pub fn actions(actions: Vec<ParsedAction>) -> Self {
        Self {
            matched: true,
            actions,
            ..Self::default()
        }
    }

    pub fn action(action: ParsedAction) -> Self {
        Self::actions(vec![action])
    }

    pub fn missing(question: impl Into<String>) -> Self {
        Self {
            matched: true,
            missing_info: Some(question.into()),
            ..Self::default()
        }
    }
}

/// Example command offered when nothing matched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub label: String,
    pub command: String,
}

impl Suggestion {
    pub fn new(label: &str, command: &str) -> Self {
        Self {
            label: label.to_string(),
            command: command.to_string(),
        }
    }
}

/// Engine output for one command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    pub success: bool,
    pub actions: Vec<ParsedAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<Suggestion>>,
    pub schema_version: u32,
    pub parser_version: String,
}

impl ParseResult {
    fn base(success: bool, actions: Vec<ParsedAction>) -> Self {
        Self {
            success,
            actions,
            missing_info: None,
            error: None,
            suggestions: None,
            schema_version: SCHEMA_VERSION,
            parser_version: PARSER_VERSION.to_string(),
        }
    }

    pub fn from_actions(actions: Vec<ParsedAction>) -> Self {
        Self::base(!actions.is_empty(), actions)
    }

    pub fn missing_info(question: impl Into<String>) -> Self {
        Self {
            missing_info: Some(question.into()),
            ..Self::base(false, Vec::new())
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::base(false, Vec::new())
        }
    }

    pub fn not_understood(message: impl Into<String>, suggestions: Vec<Suggestion>) -> Self {
        Self {
            suggestions: Some(suggestions),
            ..Self::error(message)
        }
    }

    /// Action types in order, handy for display and assertions
    pub fn action_types(&self) -> Vec<&str> {
        self.actions.iter().map(|a| a.action_type.as_str()).collect()
    }
}
