//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// docval - Validate documents against requirements with an LLM judge.
///
/// Supports DOCX, HTML and LaTeX documents.
#[derive(Debug, Parser)]
#[command(name = "docval")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (default: ~/.docval/config.toml)
    #[arg(long, global = true, env = "DOCVAL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `docval_engine=debug` (overrides RUST_LOG)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Summary and table (default)
    Table,
    /// Full report as JSON
    Json,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => Self::Table,
            CliFormat::Json => Self::Json,
        }
    }
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate a document against requirements
    Validate(ValidateArgs),

    /// Write a sample requirement file
    InitSpec(InitSpecArgs),
}

/// Arguments for the validate command.
#[derive(Debug, Parser)]
pub struct ValidateArgs {
    /// Document to validate (.docx, .html, .htm, .tex, .latex)
    pub file: PathBuf,

    /// JSON file containing requirements
    #[arg(short = 's', long)]
    pub spec_file: Option<PathBuf>,

    /// Inline requirement in the form "name:description" (repeatable)
    #[arg(short = 'r', long = "spec")]
    pub specs: Vec<String>,

    /// Judge backend: openai, github, nebulaone, ollama or mock
    #[arg(short, long)]
    pub backend: Option<String>,

    /// Model name
    #[arg(short, long)]
    pub model: Option<String>,

    /// Force an extractor: docx, html or latex (default: by file extension)
    #[arg(short, long)]
    pub parser: Option<String>,

    /// API key (default: GITHUB_TOKEN, NEBULAONE_API_KEY or OPENAI_API_KEY)
    #[arg(short = 'k', long)]
    pub api_key: Option<String>,

    /// API base URL (default: OPENAI_BASE_URL or NEBULAONE_BASE_URL)
    #[arg(short = 'u', long)]
    pub base_url: Option<String>,

    /// Write the report as JSON to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Show confidence and reasoning for every requirement
    #[arg(short, long)]
    pub verbose: bool,

    /// Seconds to wait for each judge call
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Arguments for the init-spec command.
#[derive(Debug, Parser)]
pub struct InitSpecArgs {
    /// Path of the requirement file to create
    pub output: PathBuf,
}
