//! Validation findings
//!
//! Every validator in this crate is exhaustive rather than fail-fast: it returns a
//! [`Findings`] list holding each violation it found, tagged with the structural
//! path of the offending field relative to the value being validated. Parents
//! compose their children's findings by nesting them under a path prefix, so a
//! finding raised deep inside a criteria tree surfaces as, for example,
//! `Criteria.Or[0].And[1].Filters.Eq`.
//!
//! # Examples
//!
//! ```
//! use sdp_common::validation::{FindingKind, Findings};
//!
//! let mut child = Findings::new();
//! child.push("Eq", FindingKind::NotEmpty);
//!
//! let mut parent = Findings::new();
//! parent.extend_nested("Filters", child);
//!
//! assert_eq!(parent.paths(), vec!["Filters.Eq"]);
//! ```

use serde::{Serialize, Serializer};
use serde_json::{json, Value};
use thiserror::Error;

/// The kind of a single validation violation, with its diagnostic payload
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FindingKind {
    #[error("Must not be empty")]
    NotEmpty,

    #[error("Must be at most {max_length} characters")]
    MaxLength { max_length: usize },

    #[error("Must be one of the allowed values")]
    AllowedValue { value: String, allowed: Vec<String> },

    #[error("Must be a year in the format YYYY")]
    InvalidYear { value: String },

    #[error("Must be a year range in the format YYYY/YYYY with consecutive years")]
    InvalidYearRange { value: String },

    #[error("Must be a valid time period code")]
    DisallowedCode { value: String, allowed: Vec<String> },

    #[error("Time period code must allow a year range period")]
    DisallowedCodeForPeriod { value: String, allowed: Vec<String> },

    #[error("Must be a location in the format LEVEL|PROPERTY|VALUE: {reason}")]
    MalformedLocationReference { value: String, reason: String },

    #[error("Must be a time period in the format PERIOD|CODE")]
    MalformedTimePeriodReference { value: String },

    #[error("Must be a sort in the format FIELD|DIRECTION")]
    MalformedSortReference { value: String },

    #[error("Sort field must be at most {max_length} characters")]
    SortFieldMaxLength { max_length: usize },

    #[error("{}", describe_bounds(.min, .max))]
    OutOfBounds {
        value: i64,
        min: i64,
        max: Option<i64>,
    },
}

fn describe_bounds(min: &i64, max: &Option<i64>) -> String {
    match max {
        Some(max) => format!("Must be between {} and {}", min, max),
        None => format!("Must be greater than or equal to {}", min),
    }
}

impl FindingKind {
    /// Stable machine-readable code for this kind of finding
    pub fn code(&self) -> &'static str {
        match self {
            FindingKind::NotEmpty => "NotEmpty",
            FindingKind::MaxLength { .. } => "MaximumLength",
            FindingKind::AllowedValue { .. } => "AllowedValue",
            FindingKind::InvalidYear { .. } => "TimePeriodYear",
            FindingKind::InvalidYearRange { .. } => "TimePeriodYearRange",
            FindingKind::DisallowedCode { .. } => "TimePeriodAllowedCode",
            FindingKind::DisallowedCodeForPeriod { .. } => "TimePeriodAllowedCodeForRange",
            FindingKind::MalformedLocationReference { .. } => "LocationFormat",
            FindingKind::MalformedTimePeriodReference { .. } => "TimePeriodFormat",
            FindingKind::MalformedSortReference { .. } => "SortFormat",
            FindingKind::SortFieldMaxLength { .. } => "SortFieldMaxLength",
            FindingKind::OutOfBounds { .. } => "OutOfBounds",
        }
    }

    /// Diagnostic payload exposed to callers alongside the message
    pub fn detail(&self) -> Option<Value> {
        match self {
            FindingKind::NotEmpty => None,
            FindingKind::MaxLength { max_length }
            | FindingKind::SortFieldMaxLength { max_length } => {
                Some(json!({ "maxLength": max_length }))
            },
            FindingKind::AllowedValue { value, allowed }
            | FindingKind::DisallowedCode { value, allowed }
            | FindingKind::DisallowedCodeForPeriod { value, allowed } => {
                Some(json!({ "value": value, "allowed": allowed }))
            },
            FindingKind::InvalidYear { value }
            | FindingKind::InvalidYearRange { value }
            | FindingKind::MalformedTimePeriodReference { value }
            | FindingKind::MalformedSortReference { value } => Some(json!({ "value": value })),
            FindingKind::MalformedLocationReference { value, .. } => {
                Some(json!({ "value": value }))
            },
            FindingKind::OutOfBounds { value, min, max } => {
                Some(json!({ "value": value, "min": min, "max": max }))
            },
        }
    }
}

/// A single violation at a structural path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub path: String,
    pub kind: FindingKind,
}

impl Finding {
    pub fn new(path: impl Into<String>, kind: FindingKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.path, self.kind)
        }
    }
}

#[derive(Serialize)]
struct FindingView<'a> {
    path: &'a str,
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<Value>,
}

impl Serialize for Finding {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        FindingView {
            path: &self.path,
            code: self.kind.code(),
            message: self.kind.to_string(),
            detail: self.kind.detail(),
        }
        .serialize(serializer)
    }
}

/// Ordered, accumulating list of findings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Findings(Vec<Finding>);

impl Findings {
    pub fn new() -> Self {
        Self::default()
    }

    /// A list holding one finding against the value itself (empty path)
    pub fn single(kind: FindingKind) -> Self {
        Self(vec![Finding::new("", kind)])
    }

    pub fn push(&mut self, path: impl Into<String>, kind: FindingKind) {
        self.0.push(Finding::new(path, kind));
    }

    /// Append `child` findings with their paths nested under `prefix`
    pub fn extend_nested(&mut self, prefix: &str, child: Findings) {
        self.0.extend(child.0.into_iter().map(|finding| Finding {
            path: join_path(prefix, &finding.path),
            kind: finding.kind,
        }));
    }

    /// Move every finding onto `path`
    ///
    /// String-encoded values have no addressable sub-fields, so findings raised
    /// against their decoded parts are reported against the encoded value.
    pub fn relocate(self, path: &str) -> Findings {
        Self(
            self.0
                .into_iter()
                .map(|finding| Finding::new(path, finding.kind))
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Finding> {
        self.0.iter()
    }

    pub fn paths(&self) -> Vec<&str> {
        self.0.iter().map(|finding| finding.path.as_str()).collect()
    }

    pub fn into_vec(self) -> Vec<Finding> {
        self.0
    }
}

impl std::fmt::Display for Findings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, finding) in self.0.iter().enumerate() {
            if idx > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", finding)?;
        }
        Ok(())
    }
}

impl IntoIterator for Findings {
    type Item = Finding;
    type IntoIter = std::vec::IntoIter<Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Findings {
    type Item = &'a Finding;
    type IntoIter = std::slice::Iter<'a, Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Vec<Finding>> for Findings {
    fn from(findings: Vec<Finding>) -> Self {
        Self(findings)
    }
}

/// Join a path prefix and a relative path (`Filters` + `Eq`, `In` + `[0]`)
pub fn join_path(prefix: &str, path: &str) -> String {
    if prefix.is_empty() {
        path.to_string()
    } else if path.is_empty() {
        prefix.to_string()
    } else if path.starts_with('[') {
        format!("{}{}", prefix, path)
    } else {
        format!("{}.{}", prefix, path)
    }
}

/// Path of the element at `idx` of the sequence `name`
pub fn indexed(name: &str, idx: usize) -> String {
    format!("{}[{}]", name, idx)
}

/// Validate a required, length-bounded text value
///
/// # Rules
/// - Must not be empty (after trimming whitespace)
/// - Must not exceed `max_length` characters
pub fn validate_text(value: &str, max_length: usize) -> Result<(), FindingKind> {
    if value.trim().is_empty() {
        return Err(FindingKind::NotEmpty);
    }

    if value.chars().count() > max_length {
        return Err(FindingKind::MaxLength { max_length });
    }

    Ok(())
}

/// Validate that `value` is one of `allowed` (case-sensitive)
pub fn validate_allowed(value: &str, allowed: &[&str]) -> Result<(), FindingKind> {
    if allowed.contains(&value) {
        return Ok(());
    }

    Err(FindingKind::AllowedValue {
        value: value.to_string(),
        allowed: allowed.iter().map(|a| a.to_string()).collect(),
    })
}

/// Validate that `value` lies within `[min, max]` (or `>= min` when unbounded)
pub fn validate_bounds(value: i64, min: i64, max: Option<i64>) -> Result<(), FindingKind> {
    let above_max = max.is_some_and(|max| value > max);
    if value < min || above_max {
        return Err(FindingKind::OutOfBounds { value, min, max });
    }
    Ok(())
}

/// Findings for a single value rule result (reported against the value itself)
pub fn findings_of(result: Result<(), FindingKind>) -> Findings {
    match result {
        Ok(()) => Findings::new(),
        Err(kind) => Findings::single(kind),
    }
}

/// Validate an optional sequence element-by-element
///
/// An absent sequence yields nothing; a present but empty sequence yields one
/// `NotEmpty` finding at `name`; otherwise each element's findings are nested
/// under `name[i]`, continuing past failing elements.
pub fn validate_sequence<T, F>(findings: &mut Findings, name: &str, items: Option<&[T]>, rule: F)
where
    F: Fn(&T) -> Findings,
{
    let Some(items) = items else {
        return;
    };

    if items.is_empty() {
        findings.push(name, FindingKind::NotEmpty);
        return;
    }

    for (idx, item) in items.iter().enumerate() {
        findings.extend_nested(&indexed(name, idx), rule(item));
    }
}
