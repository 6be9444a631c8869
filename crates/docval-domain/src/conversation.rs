//! Conversation history threaded through judge calls
//!
//! A [`Conversation`] is a value, not a session: every judge call receives the
//! history it should continue and returns a new, longer history. Nothing is
//! mutated in place, so a caller can always fall back to the history it held
//! before a failed call.

use serde::{Deserialize, Serialize};

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Standing instructions
    System,
    /// Prompt sent by docval
    User,
    /// Reply produced by the judge
    Assistant,
}

impl Role {
    /// Chat-API role name
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One message of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who sent the message
    pub role: Role,
    /// Message text
    pub content: String,
}

/// Immutable ordered chat history
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    /// Create an empty conversation
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns in chronological order
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Number of turns
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// True when no turn has been exchanged yet
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Return a new conversation extended by one prompt/reply exchange
    pub fn extended(&self, prompt: impl Into<String>, reply: impl Into<String>) -> Self {
        let mut turns = Vec::with_capacity(self.turns.len() + 2);
        turns.extend_from_slice(&self.turns);
        turns.push(Turn {
            role: Role::User,
            content: prompt.into(),
        });
        turns.push(Turn {
            role: Role::Assistant,
            content: reply.into(),
        });
        Self { turns }
    }
}
