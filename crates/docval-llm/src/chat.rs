//! Chat message plumbing shared by the HTTP judges

use crate::LlmError;
use docval_domain::{Conversation, Role};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One message in a chat-completion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// `system`, `user` or `assistant`
    pub role: String,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role: role.as_str().to_string(),
            content: content.into(),
        }
    }
}

/// Assemble the message list for one call
///
/// The system prompt comes first (omitted when empty), then the prior
/// history in order, then the new prompt.
pub fn build_messages(
    system_prompt: &str,
    history: Option<&Conversation>,
    prompt: &str,
) -> Vec<ChatMessage> {
    let prior = history.map(Conversation::turns).unwrap_or_default();
    let mut messages = Vec::with_capacity(prior.len() + 2);

    if !system_prompt.is_empty() {
        messages.push(ChatMessage::new(Role::System, system_prompt));
    }
    messages.extend(prior.iter().map(|t| ChatMessage::new(t.role, t.content.clone())));
    messages.push(ChatMessage::new(Role::User, prompt));

    messages
}

/// History after this exchange
pub fn continue_conversation(
    history: Option<&Conversation>,
    prompt: &str,
    reply: &str,
) -> Conversation {
    history
        .cloned()
        .unwrap_or_default()
        .extended(prompt, reply)
}

/// Blocking HTTP client with the given overall request timeout
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::blocking::Client, LlmError> {
    reqwest::blocking::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::Configuration(format!("Failed to build HTTP client: {}", e)))
}

/// Map a non-success status to the matching error
pub(crate) fn status_error(status: StatusCode, body: &str, model: &str) -> LlmError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
        StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(model.to_string()),
        _ => LlmError::Communication(format!("HTTP {}: {}", status, body)),
    }
}
