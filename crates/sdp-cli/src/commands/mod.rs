//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function.

pub mod parse;
pub mod parsed_period;
pub mod validate;

use colored::Colorize;
use sdp_common::Findings;
use serde_json::json;

use crate::error::{CliError, Result};
use crate::OutputFormat;

/// Print findings and fail when there are any
pub(crate) fn report_findings(findings: &Findings, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let report = json!({ "valid": findings.is_empty(), "errors": findings });
            println!("{}", serde_json::to_string_pretty(&report)?);
        },
        OutputFormat::Text if findings.is_empty() => {
            println!("{} Valid", "✓".green());
        },
        OutputFormat::Text => {
            for finding in findings.iter() {
                let path = if finding.path.is_empty() {
                    "(value)"
                } else {
                    finding.path.as_str()
                };
                println!(
                    "{} {}: {} [{}]",
                    "✗".red(),
                    path.bold(),
                    finding.kind,
                    finding.kind.code()
                );
            }
        },
    }

    if findings.is_empty() {
        Ok(())
    } else {
        Err(CliError::ValidationFailed(findings.len()))
    }
}
