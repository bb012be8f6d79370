//! takeoffcmd - Rule-based command parser for construction takeoffs
//!
//! Turns short imperative sentences ("Add drywall 500 sf at $12.99") into
//! typed, confidence-scored action directives for an estimating app.

pub mod command;
pub mod config;
pub mod session;

// Re-exports
pub use command::{
    default_registry, get_capabilities, parse_command, Capabilities, CommandContext,
    CommandRule, ParamValue, ParseResult, ParsedAction, RegistryError, RuleCapability,
    RuleRegistry, RuleResult, Suggestion, PARSER_VERSION, SCHEMA_VERSION,
};
pub use config::{Config, ConfigError, OutputFormat};
pub use session::{Transcript, TranscriptEntry};

/// Result type alias
pub type Result<T> = anyhow::Result<T>;
