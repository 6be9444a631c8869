//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use docval_domain::{Report, ScoringMode};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a validation report.
    pub fn format_report(&self, report: &Report, verbose: bool) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Table => Ok(self.format_report_table(report, verbose)),
        }
    }

    fn format_report_table(&self, report: &Report, verbose: bool) -> String {
        let mode = match report.mode {
            ScoringMode::Context => "shared context",
            ScoringMode::Fallback => "fallback (structure sent per requirement)",
        };

        let mut out = format!(
            "File: {}\nRequirements: {}\nPassed: {}\nFailed: {}\nScore: {:.2}% ({:.2}/{:.2})\nMode: {}\n",
            report.source_path,
            report.total_count,
            report.passed_count,
            report.failed_count,
            report.normalized_score * 100.0,
            report.achieved_weight,
            report.total_weight,
            mode,
        );

        if report.judgments.is_empty() {
            out.push('\n');
            out.push_str(&self.colorize("No requirements checked.", "yellow"));
            return out;
        }

        let mut builder = Builder::default();
        if verbose {
            builder.push_record(["Status", "Requirement", "Confidence", "Reasoning"]);
        } else {
            builder.push_record(["Status", "Requirement"]);
        }

        for judgment in &report.judgments {
            let status = if judgment.passed {
                self.colorize("✓ PASS", "green")
            } else {
                self.colorize("✗ FAIL", "red")
            };

            if verbose {
                builder.push_record([
                    status,
                    judgment.requirement_name.clone(),
                    format!("{:.2}", judgment.confidence),
                    judgment.reasoning.clone().unwrap_or_default(),
                ]);
            } else {
                builder.push_record([status, judgment.requirement_name.clone()]);
            }
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        out.push('\n');
        out.push_str(&table.to_string());
        out
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
