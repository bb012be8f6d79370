//! REPL transcripts - record every command and what the parser made of it

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::command::{CommandContext, ParseResult};

/// One REPL run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub entries: Vec<TranscriptEntry>,
}

/// A single parsed command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub at: DateTime<Utc>,
    pub command: String,
    /// Context in effect when the command was parsed
    pub context: CommandContext,
    pub result: ParseResult,
}

impl Transcript {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: now.format("%Y-%m-%d-%H-%M-%S-%3f").to_string(),
            started_at: now,
            ended_at: None,
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, command: &str, context: &CommandContext, result: &ParseResult) {
        self.entries.push(TranscriptEntry {
            at: Utc::now(),
            command: command.to_string(),
            context: context.clone(),
            result: result.clone(),
        });
    }

    /// Unused path inside a transcript directory, suffixed when the id is taken
    pub fn path_in(&self, dir: &Path) -> PathBuf {
        let mut path = dir.join(format!("{}.json", self.id));
        let mut n = 1;
        while path.exists() {
            path = dir.join(format!("{}-{}.json", self.id, n));
            n += 1;
        }
        path
    }

    /// Commands that produced at least one action
    pub fn successes(&self) -> usize {
        self.entries.iter().filter(|e| e.result.success).count()
    }

    pub fn end(&mut self) {
        self.ended_at = Some(Utc::now());
    }

    /// Write as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::debug!("Saved transcript with {} entries to {}", self.entries.len(), path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let transcript: Transcript = serde_json::from_str(&content)?;
        Ok(transcript)
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
