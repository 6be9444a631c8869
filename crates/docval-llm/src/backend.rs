//! Backend selection
//!
//! Maps a backend name to a configured judge. `openai`, `github` and
//! `nebulaone` share [`OpenAiJudge`] and differ only in where the API key and
//! base URL default from.

use crate::openai::{GITHUB_MODELS_BASE_URL, OPENAI_BASE_URL};
use crate::{LlmError, MockJudge, OllamaJudge, OpenAiJudge, DEFAULT_SYSTEM_PROMPT};
use docval_domain::Judge;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// A judge behind a trait object
pub type BoxedJudge = Box<dyn Judge<Error = LlmError> + Send + Sync>;

/// Default model name
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Reply of the `mock` backend to every prompt
pub const MOCK_BACKEND_REPLY: &str =
    "Result: PASS\nConfidence: 1.0\nReasoning: The mock backend accepts every requirement.";

/// Known judge backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// OpenAI API, or GitHub Models when `GITHUB_TOKEN` is set
    OpenAi,
    /// GitHub Models
    Github,
    /// NebulaOne gateway
    NebulaOne,
    /// Local Ollama instance
    Ollama,
    /// Offline dry run; every requirement passes
    Mock,
}

impl Backend {
    /// All backends, in the order they are listed to users
    pub const ALL: [Backend; 5] = [
        Backend::OpenAi,
        Backend::Github,
        Backend::NebulaOne,
        Backend::Ollama,
        Backend::Mock,
    ];

    /// Name accepted on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::OpenAi => "openai",
            Backend::Github => "github",
            Backend::NebulaOne => "nebulaone",
            Backend::Ollama => "ollama",
            Backend::Mock => "mock",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase();
        Backend::ALL
            .into_iter()
            .find(|b| b.as_str() == wanted)
            .ok_or_else(|| {
                let available: Vec<_> = Backend::ALL.iter().map(Backend::as_str).collect();
                LlmError::Configuration(format!(
                    "Unknown backend: {}. Available backends: {}",
                    s,
                    available.join(", ")
                ))
            })
    }
}

/// Settings common to every backend
#[derive(Debug, Clone)]
pub struct JudgeSettings {
    /// Model name
    pub model: String,
    /// Explicit API key; otherwise taken from the environment
    pub api_key: Option<String>,
    /// Explicit base URL; otherwise taken from the environment or defaults
    pub base_url: Option<String>,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
    /// Instruction sent ahead of every conversation
    pub system_prompt: String,
}

impl Default for JudgeSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            base_url: None,
            timeout_secs: crate::openai::DEFAULT_TIMEOUT_SECS,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

/// Create a judge, reading defaults from the process environment
pub fn create_judge(backend: &str, settings: &JudgeSettings) -> Result<BoxedJudge, LlmError> {
    create_judge_with_env(backend, settings, |key| std::env::var(key).ok())
}

/// Create a judge, reading defaults through `env`
pub fn create_judge_with_env(
    backend: &str,
    settings: &JudgeSettings,
    env: impl Fn(&str) -> Option<String>,
) -> Result<BoxedJudge, LlmError> {
    let backend: Backend = backend.parse()?;
    let timeout = Duration::from_secs(settings.timeout_secs);

    let judge: BoxedJudge = match backend {
        Backend::OpenAi | Backend::Github | Backend::NebulaOne => {
            let (base_url, api_key) = resolve_openai_endpoint(backend, settings, &env)?;
            info!("Using {} backend at {} (model {})", backend, base_url, settings.model);
            Box::new(
                OpenAiJudge::new(base_url, api_key, settings.model.clone())?
                    .with_system_prompt(settings.system_prompt.clone())
                    .with_timeout(timeout)?,
            )
        }
        Backend::Ollama => {
            let endpoint = settings
                .base_url
                .clone()
                .unwrap_or_else(|| crate::ollama::DEFAULT_ENDPOINT.to_string());
            info!("Using ollama backend at {} (model {})", endpoint, settings.model);
            Box::new(
                OllamaJudge::new(endpoint, settings.model.clone())?
                    .with_system_prompt(settings.system_prompt.clone())
                    .with_timeout(timeout)?,
            )
        }
        Backend::Mock => {
            info!("Using mock backend");
            Box::new(MockJudge::new(MOCK_BACKEND_REPLY))
        }
    };

    Ok(judge)
}

/// Base URL and API key for an OpenAI-compatible backend
fn resolve_openai_endpoint(
    backend: Backend,
    settings: &JudgeSettings,
    env: &impl Fn(&str) -> Option<String>,
) -> Result<(String, String), LlmError> {
    let (key_vars, base_url) = match backend {
        Backend::NebulaOne => {
            let base_url = settings
                .base_url
                .clone()
                .or_else(|| env("NEBULAONE_BASE_URL"))
                .ok_or_else(|| {
                    LlmError::Configuration(
                        "NebulaOne needs a base URL: pass one or set NEBULAONE_BASE_URL"
                            .to_string(),
                    )
                })?;
            (["NEBULAONE_API_KEY", "OPENAI_API_KEY"], base_url)
        }
        _ => {
            let base_url = settings
                .base_url
                .clone()
                .or_else(|| env("OPENAI_BASE_URL"))
                .unwrap_or_else(|| {
                    if backend == Backend::Github || env("GITHUB_TOKEN").is_some() {
                        GITHUB_MODELS_BASE_URL.to_string()
                    } else {
                        OPENAI_BASE_URL.to_string()
                    }
                });
            (["GITHUB_TOKEN", "OPENAI_API_KEY"], base_url)
        }
    };

    let api_key = settings
        .api_key
        .clone()
        .or_else(|| key_vars.iter().find_map(|var| env(var)))
        .ok_or_else(|| {
            LlmError::Configuration(format!(
                "No API key for the {} backend: pass one or set {}",
                backend,
                key_vars.join(" or ")
            ))
        })?;

    Ok((base_url, api_key))
}
