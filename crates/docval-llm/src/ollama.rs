//! Ollama Judge Implementation
//!
//! Provides integration with Ollama's local chat API, for running the judge
//! on a local model.
//!
//! # Features
//!
//! - Blocking HTTP communication with `POST /api/chat`
//! - Configurable endpoint and model
//! - Retry logic with exponential backoff
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use docval_domain::Judge;
//! use docval_llm::OllamaJudge;
//!
//! let judge = OllamaJudge::new("http://localhost:11434", "llama3").unwrap();
//! let reply = judge.send("Say PASS", None).unwrap();
//! println!("{}", reply.text);
//! ```

use crate::chat::{build_messages, continue_conversation, http_client, status_error, ChatMessage};
use crate::{LlmError, DEFAULT_SYSTEM_PROMPT};
use docval_domain::{Conversation, Judge, JudgeResponse};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for one request (local models can be slow)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Judge backed by a local Ollama instance
pub struct OllamaJudge {
    endpoint: String,
    model: String,
    system_prompt: String,
    client: reqwest::blocking::Client,
    max_retries: u32,
}

/// Request body for the Ollama chat API
#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

/// Response from the Ollama chat API
#[derive(Deserialize)]
struct OllamaChatResponse {
    message: ChatMessage,
}

impl OllamaJudge {
    /// Create a new Ollama judge
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama3", "mistral")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        Ok(Self {
            endpoint: endpoint.into(),
            model: model.into(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            client: http_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Create a new Ollama judge on `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the maximum number of attempts per call
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
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

    /// Send messages, retrying transient failures
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Ollama is not running
    /// - Model is not available (not retried)
    /// - Response format is invalid (not retried)
    fn chat(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let url = format!("{}/api/chat", self.endpoint.trim_end_matches('/'));
        let request_body = OllamaChatRequest {
            model: &self.model,
            messages,
            stream: false,
        };

        // Retry logic with exponential backoff
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self.client.post(&url).json(&request_body).send() {
                Ok(response) if response.status().is_success() => {
                    return response
                        .json::<OllamaChatResponse>()
                        .map(|r| r.message.content)
                        .map_err(|e| {
                            LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                        });
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response
                        .text()
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    match status_error(status, &body, &self.model) {
                        e @ LlmError::ModelNotAvailable(_) => return Err(e),
                        e => last_error = Some(e),
                    }
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                warn!(
                    "Ollama attempt {}/{} failed, retrying in {:?}",
                    attempts, self.max_retries, delay
                );
                std::thread::sleep(delay);
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }
}

impl Judge for OllamaJudge {
    type Error = LlmError;

    fn send(
        &self,
        prompt: &str,
        history: Option<&Conversation>,
    ) -> Result<JudgeResponse, Self::Error> {
        let messages = build_messages(&self.system_prompt, history, prompt);
        debug!(
            "POST api/chat: model={}, {} messages",
            self.model,
            messages.len()
        );

        let text = self.chat(&messages)?;
        Ok(JudgeResponse {
            conversation: continue_conversation(history, prompt, &text),
            text,
        })
    }
}

impl std::fmt::Debug for OllamaJudge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OllamaJudge")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_judge_creation() {
        let judge = OllamaJudge::new("http://localhost:11434", "llama3").unwrap();
        assert_eq!(judge.endpoint, "http://localhost:11434");
        assert_eq!(judge.model, "llama3");
        assert_eq!(judge.max_retries, DEFAULT_MAX_RETRIES);
    }

    #[test]
    fn test_ollama_judge_default_endpoint() {
        let judge = OllamaJudge::default_endpoint("mistral").unwrap();
        assert_eq!(judge.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(judge.model, "mistral");
    }

    #[test]
    fn test_ollama_judge_with_max_retries() {
        let judge = OllamaJudge::default_endpoint("llama3")
            .unwrap()
            .with_max_retries(5);
        assert_eq!(judge.max_retries, 5);
    }

    #[test]
    fn test_ollama_error_handling() {
        // Invalid port, fails before any network traffic
        let judge = OllamaJudge::new("http://localhost:99999", "llama3")
            .unwrap()
            .with_max_retries(1);

        match judge.send("test", None) {
            Err(LlmError::Communication(_)) => {}
            other => panic!("Expected Communication error, got {:?}", other.map(|r| r.text)),
        }
    }
}
