//! Requirements and the judgments produced for them

use serde::{Deserialize, Serialize};

/// A named, weighted natural-language criterion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    /// Unique name within one run
    pub name: String,

    /// What the judge should check
    pub description: String,

    /// Free-text grouping, not used in scoring
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Weight added to the achieved total when this requirement passes.
    /// Negative weights encode penalties.
    #[serde(default = "default_score")]
    pub score: f64,
}

impl Requirement {
    /// Create a requirement with the default weight of 1.0
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            category: None,
            score: default_score(),
        }
    }

    /// Set the category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the weight
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }
}

fn default_score() -> f64 {
    1.0
}

/// The judge's verdict for one requirement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Judgment {
    /// Name of the requirement this judgment belongs to
    pub requirement_name: String,

    /// Whether the requirement is met
    pub passed: bool,

    /// Judge confidence in [0.0, 1.0]
    pub confidence: f64,

    /// Explanation given by the judge, or the error that prevented a verdict
    #[serde(default)]
    pub reasoning: Option<String>,
}

impl Judgment {
    /// Synthesize a failed judgment for a call that produced no verdict
    pub fn failed(requirement_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            requirement_name: requirement_name.into(),
            passed: false,
            confidence: 0.0,
            reasoning: Some(reason.into()),
        }
    }
}
