//! Init-spec command implementation.

use crate::cli::InitSpecArgs;
use crate::error::Result;
use crate::output::Formatter;
use docval_domain::Requirement;
use std::fs;

/// Requirements written by `init-spec`.
pub fn sample_requirements() -> Vec<Requirement> {
    vec![
        Requirement::new("Has Title", "Document must contain a title in the metadata")
            .with_category("metadata")
            .with_score(2.0),
        Requirement::new("Has Author", "Document must have an author specified in metadata")
            .with_category("metadata")
            .with_score(1.0),
        Requirement::new(
            "Has Headings",
            "Document must use heading styles (Heading 1, Heading 2, etc.)",
        )
        .with_category("structure")
        .with_score(1.5),
        Requirement::new("Has Table of Contents", "Document should include a table of contents")
            .with_category("structure")
            .with_score(0.5),
    ]
}

/// Execute the init-spec command.
pub fn execute_init_spec(args: InitSpecArgs, formatter: &Formatter) -> Result<()> {
    let contents = serde_json::to_string_pretty(&sample_requirements())?;
    fs::write(&args.output, contents + "\n")?;

    println!(
        "{}",
        formatter.success(&format!(
            "Sample requirement file created: {}",
            args.output.display()
        ))
    );
    Ok(())
}
