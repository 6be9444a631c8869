//! Core ValidationEngine implementation

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::parser::parse_judgment;
use crate::prompt::{context_prompt, requirement_prompt, standalone_prompt};
use crate::requirements::ensure_unique_names;
use docval_domain::{
    Conversation, DocumentStructure, Judge, JudgeResponse, Judgment, Report, Requirement,
    ScoringMode,
};
use docval_extract::ExtractorRegistry;
use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Scores documents against weighted requirements with a judge
///
/// One run extracts the document, hands its structure to the judge once and
/// then asks about each requirement inside that shared conversation. When the
/// judge cannot take the shared context, every requirement prompt carries the
/// structure instead.
pub struct ValidationEngine<J>
where
    J: Judge,
{
    judge: Arc<J>,
    registry: ExtractorRegistry,
    config: EngineConfig,
}

impl<J> ValidationEngine<J>
where
    J: Judge + Send + Sync + 'static,
    J::Error: Display,
{
    /// Create a new engine with the built-in extractors
    pub fn new(judge: J, config: EngineConfig) -> Result<Self, EngineError> {
        config.validate().map_err(EngineError::Config)?;
        Ok(Self {
            judge: Arc::new(judge),
            registry: ExtractorRegistry::default(),
            config,
        })
    }

    /// Replace the extractor registry
    pub fn with_registry(mut self, registry: ExtractorRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Select an extractor and parse the document
    pub fn extract(&self, path: &Path) -> Result<DocumentStructure, EngineError> {
        let extractor = match &self.config.parser {
            Some(name) => self.registry.get(name)?,
            None => self.registry.detect(path)?,
        };
        Ok(extractor.parse(path)?)
    }

    /// Validate a document file against requirements
    ///
    /// Extraction failures abort the run. Judge failures never do: a failed
    /// context setup switches to fallback mode and a failed scoring call
    /// fails only its own requirement.
    pub async fn validate(
        &self,
        path: &Path,
        requirements: &[Requirement],
    ) -> Result<Report, EngineError> {
        ensure_unique_names(requirements)?;

        info!(
            "Validating {} against {} requirements",
            path.display(),
            requirements.len()
        );

        let structure = self.extract(path)?;
        self.validate_structure(&structure, requirements).await
    }

    /// Validate an already extracted structure against requirements
    pub async fn validate_structure(
        &self,
        structure: &DocumentStructure,
        requirements: &[Requirement],
    ) -> Result<Report, EngineError> {
        ensure_unique_names(requirements)?;

        let structure_json = structure.to_context_json()?;
        debug!("Document structure: {} bytes of JSON", structure_json.len());

        let mut judgments = Vec::with_capacity(requirements.len());

        let mode = match self.establish_context(&structure_json).await {
            Some(mut conversation) => {
                info!("Using context-based validation (structure shared once)");
                for requirement in requirements {
                    let (judgment, next) = self.score_in_context(requirement, &conversation).await;
                    judgments.push(judgment);
                    if let Some(next) = next {
                        conversation = next;
                    }
                }
                ScoringMode::Context
            }
            None => {
                info!("Using fallback validation (structure repeated per requirement)");
                for requirement in requirements {
                    judgments.push(self.score_standalone(requirement, &structure_json).await);
                }
                ScoringMode::Fallback
            }
        };

        let report = Report::aggregate(
            structure.source_path.clone(),
            requirements,
            judgments,
            mode,
        );

        info!(
            "Validation complete: {}/{} passed, score {:.2}",
            report.passed_count, report.total_count, report.normalized_score
        );

        Ok(report)
    }

    /// Hand the structure to the judge; `None` means fall back
    async fn establish_context(&self, structure_json: &str) -> Option<Conversation> {
        let prompt = context_prompt(structure_json);
        debug!("Context setup prompt:\n{}", prompt);

        match self.call_judge(prompt, None).await {
            Ok(response) => {
                debug!("Context setup response: {}", response.text);
                Some(response.conversation)
            }
            Err(e) => {
                warn!("Context setup failed ({}); falling back to per-requirement prompts", e);
                None
            }
        }
    }

    /// Score one requirement in the shared conversation
    ///
    /// Returns the conversation to continue with, or `None` when the call
    /// failed and the previous one should be kept.
    async fn score_in_context(
        &self,
        requirement: &Requirement,
        conversation: &Conversation,
    ) -> (Judgment, Option<Conversation>) {
        let prompt = requirement_prompt(requirement);
        debug!("Scoring '{}' in context:\n{}", requirement.name, prompt);

        match self.call_judge(prompt, Some(conversation.clone())).await {
            Ok(response) => {
                debug!("Response for '{}': {}", requirement.name, response.text);
                (
                    parse_judgment(&requirement.name, &response.text),
                    Some(response.conversation),
                )
            }
            Err(e) => (self.failed(requirement, e), None),
        }
    }

    /// Score one requirement with the structure embedded in the prompt
    async fn score_standalone(&self, requirement: &Requirement, structure_json: &str) -> Judgment {
        let prompt = standalone_prompt(requirement, structure_json);
        debug!("Scoring '{}' standalone:\n{}", requirement.name, prompt);

        match self.call_judge(prompt, None).await {
            Ok(response) => {
                debug!("Response for '{}': {}", requirement.name, response.text);
                parse_judgment(&requirement.name, &response.text)
            }
            Err(e) => self.failed(requirement, e),
        }
    }

    fn failed(&self, requirement: &Requirement, error: EngineError) -> Judgment {
        warn!("Scoring '{}' failed: {}", requirement.name, error);
        Judgment::failed(&requirement.name, format!("Validation error: {}", error))
    }

    /// Call the judge on the blocking pool, bounded by the configured timeout
    async fn call_judge(
        &self,
        prompt: String,
        history: Option<Conversation>,
    ) -> Result<JudgeResponse, EngineError> {
        let judge = Arc::clone(&self.judge);

        // Judge is not async
        let task = tokio::task::spawn_blocking(move || {
            judge
                .send(&prompt, history.as_ref())
                .map_err(|e| EngineError::Judge(e.to_string()))
        });

        timeout(self.config.judge_timeout(), task)
            .await
            .map_err(|_| EngineError::Timeout(self.config.judge_timeout_secs))?
            .map_err(|e| EngineError::Judge(format!("Task join error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docval_llm::MockJudge;

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig {
            judge_timeout_secs: 0,
            ..EngineConfig::default()
        };
        let result = ValidationEngine::new(MockJudge::default(), config);
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn test_extract_with_forced_unknown_parser() {
        let engine =
            ValidationEngine::new(MockJudge::default(), EngineConfig::default().with_parser("pdf"))
                .unwrap();
        let err = engine.extract(Path::new("doc.pdf")).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Extraction(docval_domain::ExtractError::UnknownFormat { .. })
        ));
    }

    #[test]
    fn test_engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ValidationEngine<MockJudge>>();
    }
}
