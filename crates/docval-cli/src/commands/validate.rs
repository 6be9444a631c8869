//! Validate command implementation.

use crate::cli::ValidateArgs;
use crate::config::{Config, OutputFormat};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use docval_domain::Requirement;
use docval_engine::{load_requirements, EngineConfig, ValidationEngine};
use docval_llm::{create_judge, JudgeSettings};
use std::fs;
use tracing::warn;

/// Execute the validate command.
///
/// Returns whether every requirement passed. Judges use blocking HTTP
/// clients, so the runtime is created here around the engine call and shut
/// down before the judge is dropped.
pub fn execute_validate(args: ValidateArgs, config: &Config, formatter: &Formatter) -> Result<bool> {
    let requirements = collect_requirements(&args, formatter)?;
    if requirements.is_empty() {
        return Err(CliError::InvalidInput(
            "No requirements provided. Use --spec-file or --spec.".to_string(),
        ));
    }

    let backend = args
        .backend
        .clone()
        .unwrap_or_else(|| config.judge.backend.clone());
    let timeout_secs = args.timeout.unwrap_or(config.judge.timeout_secs);

    let settings = JudgeSettings {
        model: args.model.clone().unwrap_or_else(|| config.judge.model.clone()),
        api_key: args.api_key.clone(),
        base_url: args.base_url.clone().or_else(|| config.judge.base_url.clone()),
        timeout_secs,
        ..JudgeSettings::default()
    };

    let mut engine_config = EngineConfig {
        judge_timeout_secs: timeout_secs,
        ..EngineConfig::default()
    };
    if let Some(parser) = &args.parser {
        engine_config = engine_config.with_parser(parser.clone());
    }

    if formatter.format() == OutputFormat::Table {
        println!("Validating: {}", args.file.display());
        println!("Backend: {} (model {})", backend, settings.model);
        match &args.parser {
            Some(parser) => println!("Parser: {}", parser),
            None => println!("Parser: auto-detect from file extension"),
        }
        println!("Requirements: {}", requirements.len());
        println!();
    }

    let judge = create_judge(&backend, &settings)?;
    let engine = ValidationEngine::new(judge, engine_config)?;

    let report = {
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(engine.validate(&args.file, &requirements))?
    };

    println!("{}", formatter.format_report(&report, args.verbose)?);

    if let Some(output) = &args.output {
        fs::write(output, serde_json::to_string_pretty(&report)? + "\n")?;
        if formatter.format() == OutputFormat::Table {
            println!();
            println!(
                "{}",
                formatter.info(&format!("Report saved to: {}", output.display()))
            );
        }
    }

    Ok(report.all_passed())
}

/// Parse an inline requirement of the form `name:description`.
///
/// Both parts are trimmed; only the first `:` separates them.
pub fn parse_inline_requirement(spec: &str) -> Option<Requirement> {
    let (name, description) = spec.split_once(':')?;
    Some(Requirement::new(name.trim(), description.trim()))
}

/// Requirements from the spec file followed by the inline ones.
fn collect_requirements(args: &ValidateArgs, formatter: &Formatter) -> Result<Vec<Requirement>> {
    let mut requirements = match &args.spec_file {
        Some(path) => load_requirements(path)?,
        None => Vec::new(),
    };

    for spec in &args.specs {
        match parse_inline_requirement(spec) {
            Some(requirement) => requirements.push(requirement),
            None => {
                warn!("Skipping inline requirement without ':': {}", spec);
                eprintln!(
                    "{}",
                    formatter.warning(&format!(
                        "Invalid spec format (expected name:description): {}",
                        spec
                    ))
                );
            }
        }
    }

    Ok(requirements)
}
