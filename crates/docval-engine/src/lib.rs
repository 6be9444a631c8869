//! docval Validation Engine
//!
//! Scores documents against named, weighted requirements using a judge.
//!
//! # Overview
//!
//! A run extracts the document into its canonical structure, establishes one
//! shared conversation in which the judge has seen the structure, and then
//! asks about each requirement in turn. Free-text replies are parsed into
//! judgments and aggregated into a weighted report.
//!
//! # Architecture
//!
//! ```text
//! File → ExtractorRegistry → DocumentStructure → Judge (context) → Judge (per requirement) → Report
//! ```
//!
//! # Key Features
//!
//! - **Shared Context**: the structure is sent once per run, not once per requirement
//! - **Fallback Mode**: if the judge cannot take the shared context, each prompt carries the structure
//! - **Failure Isolation**: a failed or timed-out judge call fails only its own requirement
//! - **Deterministic Scoring**: weighted aggregation independent of the judge
//!
//! # Example Usage
//!
//! ```no_run
//! use docval_engine::{load_requirements, EngineConfig, ValidationEngine};
//! use docval_llm::MockJudge;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let judge = MockJudge::new("Result: PASS\nConfidence: 0.9\nReasoning: ok");
//! let engine = ValidationEngine::new(judge, EngineConfig::default())?;
//!
//! let requirements = load_requirements(Path::new("specs.json"))?;
//! let report = engine.validate(Path::new("thesis.tex"), &requirements).await?;
//!
//! println!("Score: {:.1}%", report.normalized_score * 100.0);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod engine;
mod error;
mod parser;
mod prompt;
mod requirements;


pub use config::EngineConfig;
pub use engine::ValidationEngine;
pub use error::{EngineError, SchemaError};
pub use parser::{parse_judgment, DEFAULT_CONFIDENCE};
pub use prompt::CONTEXT_ACKNOWLEDGEMENT;
pub use requirements::{ensure_unique_names, load_requirements, parse_requirements};
