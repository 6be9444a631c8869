//! OpenAI-compatible judge
//!
//! Talks to any endpoint exposing `POST {base_url}/chat/completions` with
//! bearer authentication: OpenAI itself, GitHub Models, NebulaOne and other
//! compatible gateways.
//!
//! # Examples
//!
//! ```no_run
//! use docval_domain::Judge;
//! use docval_llm::OpenAiJudge;
//!
//! let judge = OpenAiJudge::new("https://api.openai.com/v1", "sk-...", "gpt-4o-mini").unwrap();
//! let reply = judge.send("Say PASS", None).unwrap();
//! println!("{}", reply.text);
//! ```

use crate::chat::{build_messages, continue_conversation, http_client, status_error, ChatMessage};
use crate::{LlmError, DEFAULT_SYSTEM_PROMPT};
use docval_domain::{Conversation, Judge, JudgeResponse};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Default OpenAI API base URL
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// GitHub Models base URL
pub const GITHUB_MODELS_BASE_URL: &str = "https://models.inference.ai.azure.com";

/// Default timeout for one completion request
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Judge backed by an OpenAI-compatible chat-completions endpoint
pub struct OpenAiJudge {
    base_url: String,
    api_key: String,
    model: String,
    system_prompt: String,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

impl OpenAiJudge {
    /// Create a judge for `model` at `base_url`
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            client: http_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?,
        })
    }

    /// Replace the system prompt sent ahead of every conversation
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    /// Set the HTTP request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, LlmError> {
        self.client = http_client(timeout)?;
        Ok(self)
    }

    /// Endpoint base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Model name
    pub fn model(&self) -> &str {
        &self.model
    }

    fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let request = CompletionRequest {
            model: &self.model,
            messages,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Communication(format!("Request to {} timed out", url))
                } else {
                    LlmError::Communication(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(status_error(status, &body, &self.model));
        }

        let body: serde_json::Value = response
            .json()
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        body.pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                LlmError::InvalidResponse("missing choices[0].message.content".to_string())
            })
    }
}

impl Judge for OpenAiJudge {
    type Error = LlmError;

    fn send(
        &self,
        prompt: &str,
        history: Option<&Conversation>,
    ) -> Result<JudgeResponse, Self::Error> {
        let messages = build_messages(&self.system_prompt, history, prompt);
        debug!(
            "POST chat/completions: model={}, {} messages",
            self.model,
            messages.len()
        );

        let text = self.complete(messages)?;
        Ok(JudgeResponse {
            conversation: continue_conversation(history, prompt, &text),
            text,
        })
    }
}

impl std::fmt::Debug for OpenAiJudge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiJudge")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}
