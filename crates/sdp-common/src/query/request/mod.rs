//! Data set query requests
//!
//! [`DataSetQueryRequest`] is the JSON body of a POST query. It carries a
//! criteria tree plus the indicators to return, sorting and paging.
//! [`get::DataSetGetQueryRequest`] is the flattened form built from URL query
//! parameters, which converts into the POST form once valid.

pub mod get;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::criteria::Criteria;
use super::error::QueryError;
use super::sort::Sort;
use crate::validation::{
    findings_of, validate_bounds, validate_sequence, validate_text, FindingKind, Findings,
};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 1000;
pub const MAX_PAGE_SIZE: i64 = 10_000;

/// Maximum length of an indicator ID in a POST body
pub const INDICATOR_MAX_LENGTH: usize = 40;

fn default_page() -> i64 {
    DEFAULT_PAGE
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DataSetQueryRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria: Option<Criteria>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indicators: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorts: Option<Vec<Option<Sort>>>,

    #[serde(default)]
    pub debug: bool,

    #[serde(default = "default_page")]
    pub page: i64,

    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

impl Default for DataSetQueryRequest {
    fn default() -> Self {
        Self {
            criteria: None,
            indicators: None,
            sorts: None,
            debug: false,
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Validate an optional indicator list with a per-indicator length limit
pub(crate) fn validate_indicators(
    findings: &mut Findings,
    indicators: Option<&[String]>,
    max_length: usize,
) {
    validate_sequence(findings, "Indicators", indicators, |indicator: &String| {
        findings_of(validate_text(indicator, max_length))
    });
}

pub(crate) fn validate_paging(findings: &mut Findings, page: i64, page_size: i64) {
    if let Err(kind) = validate_bounds(page, 1, None) {
        findings.push("Page", kind);
    }
    if let Err(kind) = validate_bounds(page_size, 1, Some(MAX_PAGE_SIZE)) {
        findings.push("PageSize", kind);
    }
}

impl DataSetQueryRequest {
    /// Deserialize a request body
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn validate(&self) -> Findings {
        let mut findings = Findings::new();

        if let Some(criteria) = &self.criteria {
            findings.extend_nested("Criteria", criteria.validate());
        }

        validate_indicators(&mut findings, self.indicators.as_deref(), INDICATOR_MAX_LENGTH);

        validate_sequence(&mut findings, "Sorts", self.sorts.as_deref(), |sort: &Option<Sort>| {
            match sort {
                Some(sort) => sort.validate(),
                None => Findings::single(FindingKind::NotEmpty),
            }
        });

        validate_paging(&mut findings, self.page, self.page_size);

        findings
    }

    /// Return the request unchanged if it is valid
    pub fn validated(self) -> Result<Self, QueryError> {
        let findings = self.validate();
        if findings.is_empty() {
            debug!(page = self.page, page_size = self.page_size, "Query request is valid");
            return Ok(self);
        }

        debug!(count = findings.len(), "Query request has validation findings");
        Err(QueryError::Invalid(findings))
    }
}
