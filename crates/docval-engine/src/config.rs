//! Configuration for the ValidationEngine

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the ValidationEngine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Force an extractor by name (`docx`, `html`, `latex`); auto-detect when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parser: Option<String>,

    /// Maximum time for a single judge call (seconds)
    pub judge_timeout_secs: u64,
}

impl EngineConfig {
    /// Get the judge timeout as a Duration
    pub fn judge_timeout(&self) -> Duration {
        Duration::from_secs(self.judge_timeout_secs)
    }

    /// Force an extractor by name
    pub fn with_parser(mut self, parser: impl Into<String>) -> Self {
        self.parser = Some(parser.into());
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.judge_timeout_secs == 0 {
            return Err("judge_timeout_secs must be greater than 0".to_string());
        }
        if matches!(&self.parser, Some(p) if p.trim().is_empty()) {
            return Err("parser must not be empty when set".to_string());
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    /// Default configuration: auto-detect, two minutes per judge call
    fn default() -> Self {
        Self {
            parser: None,
            judge_timeout_secs: 120,
        }
    }
}
