//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the domain and infrastructure.
//! Implementations live in other crates.

use crate::conversation::Conversation;
use crate::document::DocumentStructure;
use crate::error::ExtractError;
use std::path::Path;

/// Converts one source format into a [`DocumentStructure`]
///
/// Implemented by the infrastructure layer (docval-extract)
pub trait FormatExtractor {
    /// Check whether this extractor handles a file extension
    ///
    /// Pure predicate; comparison is case-insensitive and a leading dot is
    /// optional.
    fn supports_extension(&self, extension: &str) -> bool;

    /// Parse a file into a fresh document structure
    fn parse(&self, path: &Path) -> Result<DocumentStructure, ExtractError>;
}

/// Reply from a [`Judge`] call
#[derive(Debug, Clone)]
pub struct JudgeResponse {
    /// Text produced by the model
    pub text: String,
    /// History extended by this exchange
    pub conversation: Conversation,
}

/// Remote reasoning service used to judge requirements
///
/// Implemented by the infrastructure layer (docval-llm)
pub trait Judge {
    /// Error type for judge calls
    type Error;

    /// Send a prompt, optionally continuing a prior conversation
    ///
    /// The returned conversation extends `history` (or starts a new one) with
    /// this prompt and the reply. `history` itself is left untouched.
    fn send(
        &self,
        prompt: &str,
        history: Option<&Conversation>,
    ) -> Result<JudgeResponse, Self::Error>;
}

impl<J: Judge + ?Sized> Judge for Box<J> {
    type Error = J::Error;

    fn send(
        &self,
        prompt: &str,
        history: Option<&Conversation>,
    ) -> Result<JudgeResponse, Self::Error> {
        (**self).send(prompt, history)
    }
}
