//! `sdp parse` command implementation
//!
//! Parses a compact encoding, validates it and prints the structured value as
//! JSON.

use sdp_common::query::{LocationReference, Sort, TimePeriod};
use sdp_common::Findings;
use serde::Serialize;

use super::report_findings;
use crate::error::{CliError, Result};
use crate::{OutputFormat, ParseCommand};

pub fn run(command: &ParseCommand) -> Result<()> {
    match command {
        ParseCommand::Location { value } => {
            let location = LocationReference::parse(value).map_err(|source| CliError::Location {
                value: value.clone(),
                source,
            })?;
            print_valid(&location, location.validate())
        },
        ParseCommand::TimePeriod { value } => {
            let time_period = TimePeriod::parse(value).map_err(|source| CliError::TimePeriod {
                value: value.clone(),
                source,
            })?;
            print_valid(&time_period, time_period.validate())
        },
        ParseCommand::Sort { value } => {
            let sort = Sort::parse(value).map_err(|source| CliError::Sort {
                value: value.clone(),
                source,
            })?;
            print_valid(&sort, sort.validate())
        },
    }
}

fn print_valid<T: Serialize>(value: &T, findings: Findings) -> Result<()> {
    if !findings.is_empty() {
        return report_findings(&findings, OutputFormat::Text);
    }
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
