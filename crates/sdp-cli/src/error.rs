//! Error types for SDP CLI
//!
//! Errors carry messages that say what went wrong and what input was expected.

use sdp_common::query::{LocationParseError, QueryError, SortParseError, TimePeriodParseError};
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// Required file is missing
    #[error("File not found: '{0}'. Verify the file path exists and you have read permissions.")]
    FileNotFound(String),

    /// File system operation failed
    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failed
    #[error("Failed to parse JSON: {0}. Check that the body is a data set query request.")]
    JsonParse(#[from] serde_json::Error),

    /// Query string could not be read
    #[error("{0}")]
    Query(#[from] QueryError),

    #[error("Invalid location '{value}': {source}. Expected LEVEL|PROPERTY|VALUE (e.g. 'NAT|id|12345').")]
    Location {
        value: String,
        source: LocationParseError,
    },

    #[error("Invalid time period '{value}': {source}. Expected PERIOD|CODE (e.g. '2020|AY').")]
    TimePeriod {
        value: String,
        source: TimePeriodParseError,
    },

    #[error("Invalid sort '{value}': {source}. Expected FIELD|DIRECTION (e.g. 'timePeriod|Asc').")]
    Sort {
        value: String,
        source: SortParseError,
    },

    /// Input parsed but broke one or more validation rules
    #[error("Validation failed with {0} finding(s)")]
    ValidationFailed(usize),
}
