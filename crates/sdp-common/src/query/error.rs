//! Request-level query errors

use thiserror::Error;

use super::location::LocationParseError;
use super::sort::SortParseError;
use super::time_period::TimePeriodParseError;
use crate::validation::Findings;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("query request is invalid: {0}")]
    Invalid(Findings),

    #[error("invalid query parameter '{key}': {reason}")]
    InvalidParameter { key: String, reason: String },

    #[error(transparent)]
    Location(#[from] LocationParseError),

    #[error(transparent)]
    TimePeriod(#[from] TimePeriodParseError),

    #[error(transparent)]
    Sort(#[from] SortParseError),
}

impl QueryError {
    pub fn invalid_parameter(key: impl Into<String>, reason: impl Into<String>) -> Self {
        QueryError::InvalidParameter {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Findings carried by an invalid request, if any
    pub fn findings(&self) -> Option<&Findings> {
        match self {
            QueryError::Invalid(findings) => Some(findings),
            _ => None,
        }
    }
}
