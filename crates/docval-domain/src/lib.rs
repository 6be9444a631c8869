//! docval Domain Layer
//!
//! This crate contains the core model shared by every other docval crate.
//! It defines the canonical document record, the requirement/judgment/report
//! value objects, and the trait interfaces for format extraction and for the
//! remote judge.
//!
//! ## Key Concepts
//!
//! - **Document Structure**: one format-agnostic record per parsed file
//! - **Requirement**: a named, weighted natural-language criterion
//! - **Judgment**: the parsed verdict of the judge for one requirement
//! - **Report**: all judgments of one run plus the weighted score
//! - **Conversation**: an immutable chat history threaded between judge calls
//!
//! ## Architecture
//!
//! - No I/O and no transport code
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod conversation;
pub mod document;
pub mod error;
pub mod report;
pub mod requirement;
pub mod traits;

// Re-exports for convenience
pub use conversation::{Conversation, Role, Turn};
pub use document::{DocumentStructure, DocumentType, FloatKind, StructuralElement};
pub use error::ExtractError;
pub use report::{Report, ScoringMode};
pub use requirement::{Judgment, Requirement};
pub use traits::{FormatExtractor, Judge, JudgeResponse};
