//! `sdp validate` command implementation
//!
//! Validates a JSON query body, or a URL query string with `--get`.

use std::io::Read;
use std::path::Path;

use sdp_common::query::{DataSetGetQueryRequest, DataSetQueryRequest};
use sdp_common::Findings;
use tracing::debug;

use super::report_findings;
use crate::error::{CliError, Result};
use crate::OutputFormat;

/// Validate a request read from a file or stdin
pub fn run(input: &str, get: bool, format: OutputFormat) -> Result<()> {
    let content = read_input(input)?;
    let findings = validate_content(&content, get)?;
    debug!(input, get, findings = findings.len(), "Validated request");
    report_findings(&findings, format)
}

fn validate_content(content: &str, get: bool) -> Result<Findings> {
    if get {
        let request = DataSetGetQueryRequest::from_query_string(content.trim())?;
        Ok(request.validate())
    } else {
        let request: DataSetQueryRequest = serde_json::from_str(content)?;
        Ok(request.validate())
    }
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        return Ok(content);
    }

    if !Path::new(input).exists() {
        return Err(CliError::FileNotFound(input.to_string()));
    }
    Ok(std::fs::read_to_string(input)?)
}
