//! docval CLI - Validate documents against requirements with an LLM judge.

use clap::Parser;
use docval_cli::commands;
use docval_cli::logging::init_logging;
use docval_cli::{Cli, Command, Config, Formatter};

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Returns whether the command succeeded; a validation run with failed
/// requirements is not a success.
fn run() -> docval_cli::Result<bool> {
    let cli = Cli::parse();

    init_logging(cli.log_level.as_deref())?;

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load_or_init()?,
    };

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Validate(args) => commands::execute_validate(args, &config, &formatter),
        Command::InitSpec(args) => {
            commands::execute_init_spec(args, &formatter)?;
            Ok(true)
        }
    }
}
