//! Sort specifiers (`FIELD|DIRECTION`)

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::{findings_of, validate_allowed, validate_text, FindingKind, Findings};

pub const FIELD_MAX_LENGTH: usize = 40;

pub const DIRECTIONS: [&str; 2] = ["Asc", "Desc"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SortParseError {
    #[error("sort '{0}' must be in the format FIELD|DIRECTION")]
    Malformed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "Asc",
            SortDirection::Desc => "Desc",
        }
    }
}

impl std::str::FromStr for SortDirection {
    type Err = FindingKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Asc" => Ok(SortDirection::Asc),
            "Desc" => Ok(SortDirection::Desc),
            _ => Err(FindingKind::AllowedValue {
                value: s.to_string(),
                allowed: DIRECTIONS.iter().map(|d| d.to_string()).collect(),
            }),
        }
    }
}

/// A sort on one field
///
/// `direction` is kept as text so a bad value can be reported as a finding
/// instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Sort {
    pub field: String,
    pub direction: String,
}

impl Sort {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction: direction.as_str().to_string(),
        }
    }

    /// Parse `FIELD|DIRECTION`, splitting on the last `|` so fields may contain `|`
    pub fn parse(s: &str) -> Result<Self, SortParseError> {
        let (field, direction) = s
            .rsplit_once('|')
            .ok_or_else(|| SortParseError::Malformed(s.to_string()))?;
        Ok(Self {
            field: field.to_string(),
            direction: direction.to_string(),
        })
    }

    pub fn direction(&self) -> Option<SortDirection> {
        self.direction.parse().ok()
    }

    pub fn validate(&self) -> Findings {
        let mut findings = Findings::new();
        if let Err(kind) = validate_text(&self.field, FIELD_MAX_LENGTH) {
            findings.push("Field", kind);
        }
        if let Err(kind) = validate_allowed(&self.direction, &DIRECTIONS) {
            findings.push("Direction", kind);
        }
        findings
    }
}

impl std::fmt::Display for Sort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}", self.field, self.direction)
    }
}

impl std::str::FromStr for Sort {
    type Err = SortParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Validate a string-encoded sort, reporting every finding at the value itself
pub fn validate_encoded(value: &str) -> Findings {
    if value.trim().is_empty() {
        return Findings::single(FindingKind::NotEmpty);
    }

    let sort = match Sort::parse(value) {
        Ok(sort) => sort,
        Err(_) => {
            return findings_of(Err(FindingKind::MalformedSortReference {
                value: value.to_string(),
            }))
        },
    };

    sort.validate()
        .into_iter()
        .map(|finding| match finding.kind {
            FindingKind::MaxLength { max_length } => FindingKind::SortFieldMaxLength { max_length },
            kind => kind,
        })
        .fold(Findings::new(), |mut findings, kind| {
            findings.push("", kind);
            findings
        })
}
