//! docval Judge Backends
//!
//! Implementations of the [`Judge`] trait from `docval-domain`: the remote
//! reasoning service that decides whether a document meets a requirement.
//!
//! # Architecture
//!
//! Judges are synchronous and stateless between calls. Conversation state
//! travels in the [`Conversation`] value passed to and returned from each
//! call, so every judge can continue any history.
//!
//! # Judges
//!
//! - `MockJudge`: Deterministic scripted judge for testing
//! - `OpenAiJudge`: OpenAI-compatible chat completions (OpenAI, GitHub Models, NebulaOne)
//! - `OllamaJudge`: Local Ollama chat API
//!
//! # Examples
//!
//! ```
//! use docval_domain::Judge;
//! use docval_llm::MockJudge;
//!
//! let judge = MockJudge::new("Result: PASS");
//! let reply = judge.send("Does it have a title?", None).unwrap();
//! assert_eq!(reply.text, "Result: PASS");
//! assert_eq!(reply.conversation.len(), 2);
//! ```

#![warn(missing_docs)]

pub mod backend;
pub mod chat;
pub mod ollama;
pub mod openai;

use docval_domain::{Conversation, Judge, JudgeResponse};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;

pub use backend::{create_judge, create_judge_with_env, Backend, BoxedJudge, JudgeSettings};
pub use ollama::OllamaJudge;
pub use openai::OpenAiJudge;

/// Instruction sent ahead of every conversation
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a document validation expert. \
Analyze document structures and determine if they meet specific requirements. \
Provide clear, factual assessments based on the document structure data provided.";

/// Errors that can occur during judge calls
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the model
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Backend cannot be set up (unknown name, missing key or URL)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// One call received by a [`MockJudge`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Prompt text
    pub prompt: String,
    /// Length of the history passed in, `None` when no history was given
    pub history_len: Option<usize>,
}

#[derive(Debug, Clone)]
enum Scripted {
    Reply(String),
    Fail,
    Delay(Duration),
}

/// Mock judge for deterministic testing
///
/// Returns pre-configured responses without making any network calls. Rules
/// match when their needle is a substring of the prompt. Every matching delay
/// is applied, then the first matching reply or failure rule decides the
/// outcome; with none, the default response is returned. Every call is
/// recorded.
///
/// # Examples
///
/// ```
/// use docval_domain::Judge;
/// use docval_llm::MockJudge;
///
/// let judge = MockJudge::new("Result: FAIL");
/// judge.respond_when("Has Title", "Result: PASS");
/// judge.fail_when("Has Index");
///
/// assert_eq!(judge.send("Requirement Name: Has Title", None).unwrap().text, "Result: PASS");
/// assert!(judge.send("Requirement Name: Has Index", None).is_err());
/// assert_eq!(judge.call_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockJudge {
    default_response: String,
    rules: Arc<Mutex<Vec<(String, Scripted)>>>,
    failing_calls: Arc<Mutex<Vec<usize>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockJudge {
    /// Create a mock judge with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            rules: Arc::new(Mutex::new(Vec::new())),
            failing_calls: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Reply with `response` to prompts containing `needle`
    pub fn respond_when(&self, needle: impl Into<String>, response: impl Into<String>) {
        lock(&self.rules).push((needle.into(), Scripted::Reply(response.into())));
    }

    /// Fail prompts containing `needle`
    pub fn fail_when(&self, needle: impl Into<String>) {
        lock(&self.rules).push((needle.into(), Scripted::Fail));
    }

    /// Block for `delay` before answering prompts containing `needle`
    pub fn delay_when(&self, needle: impl Into<String>, delay: Duration) {
        lock(&self.rules).push((needle.into(), Scripted::Delay(delay)));
    }

    /// Fail the `n`th call (1-based) regardless of its prompt
    pub fn fail_call(&self, n: usize) {
        lock(&self.failing_calls).push(n);
    }

    /// Get the number of times send was called
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// All calls received so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Forget recorded calls
    pub fn reset_calls(&self) {
        lock(&self.calls).clear();
    }
}

impl Default for MockJudge {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl Judge for MockJudge {
    type Error = LlmError;

    fn send(
        &self,
        prompt: &str,
        history: Option<&Conversation>,
    ) -> Result<JudgeResponse, Self::Error> {
        let call_number = {
            let mut calls = lock(&self.calls);
            calls.push(RecordedCall {
                prompt: prompt.to_string(),
                history_len: history.map(Conversation::len),
            });
            calls.len()
        };

        if lock(&self.failing_calls).contains(&call_number) {
            return Err(LlmError::Communication(format!(
                "Mock failure on call {}",
                call_number
            )));
        }

        let matching: Vec<Scripted> = lock(&self.rules)
            .iter()
            .filter(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, scripted)| scripted.clone())
            .collect();

        for scripted in &matching {
            if let Scripted::Delay(delay) = scripted {
                std::thread::sleep(*delay);
            }
        }

        let text = match matching.into_iter().find(|s| !matches!(s, Scripted::Delay(_))) {
            Some(Scripted::Reply(reply)) => reply,
            Some(_) => return Err(LlmError::Other("Mock error".to_string())),
            None => self.default_response.clone(),
        };

        Ok(JudgeResponse {
            conversation: chat::continue_conversation(history, prompt, &text),
            text,
        })
    }
}
