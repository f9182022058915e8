//! Time period references
//!
//! A time period pairs a year (`2020`) or consecutive year range (`2020/2021`)
//! with a code that says which part of which kind of year is meant (`AY` for a
//! whole academic year, `M3` for March, `T1T2` for the autumn and spring terms).
//! The compact form is `PERIOD|CODE`.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::{findings_of, FindingKind, Findings};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimePeriodParseError {
    #[error("time period '{0}' must be in the format PERIOD|CODE")]
    Malformed(String),

    #[error("'{0}' is not a valid time period code")]
    UnknownCode(String),

    #[error("period '{period}' is not valid for time period code '{code}'")]
    InvalidPeriod { period: String, code: String },
}

/// How the years of a code are counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum YearFormat {
    Academic,
    Calendar,
    Fiscal,
    Reporting,
}

impl YearFormat {
    /// Whether periods of this format span two calendar years (`2020/2021`)
    pub fn is_range(self) -> bool {
        matches!(self, YearFormat::Academic | YearFormat::Fiscal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TimePeriodCategory {
    AcademicYear,
    CalendarYear,
    FinancialYear,
    TaxYear,
    ReportingYear,
    Term,
    Month,
    Week,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimePeriodCodeInfo {
    pub category: TimePeriodCategory,
    pub year_format: YearFormat,
}

const FIXED_CODES: [(&str, TimePeriodCategory, YearFormat); 27] = [
    ("AY", TimePeriodCategory::AcademicYear, YearFormat::Academic),
    ("AYQ1", TimePeriodCategory::AcademicYear, YearFormat::Academic),
    ("AYQ2", TimePeriodCategory::AcademicYear, YearFormat::Academic),
    ("AYQ3", TimePeriodCategory::AcademicYear, YearFormat::Academic),
    ("AYQ4", TimePeriodCategory::AcademicYear, YearFormat::Academic),
    ("T1", TimePeriodCategory::Term, YearFormat::Academic),
    ("T1T2", TimePeriodCategory::Term, YearFormat::Academic),
    ("T2", TimePeriodCategory::Term, YearFormat::Academic),
    ("T3", TimePeriodCategory::Term, YearFormat::Academic),
    ("CY", TimePeriodCategory::CalendarYear, YearFormat::Calendar),
    ("CYQ1", TimePeriodCategory::CalendarYear, YearFormat::Calendar),
    ("CYQ2", TimePeriodCategory::CalendarYear, YearFormat::Calendar),
    ("CYQ3", TimePeriodCategory::CalendarYear, YearFormat::Calendar),
    ("CYQ4", TimePeriodCategory::CalendarYear, YearFormat::Calendar),
    ("FY", TimePeriodCategory::FinancialYear, YearFormat::Fiscal),
    ("FYQ1", TimePeriodCategory::FinancialYear, YearFormat::Fiscal),
    ("FYQ2", TimePeriodCategory::FinancialYear, YearFormat::Fiscal),
    ("FYQ3", TimePeriodCategory::FinancialYear, YearFormat::Fiscal),
    ("FYQ4", TimePeriodCategory::FinancialYear, YearFormat::Fiscal),
    ("P1", TimePeriodCategory::FinancialYear, YearFormat::Fiscal),
    ("P2", TimePeriodCategory::FinancialYear, YearFormat::Fiscal),
    ("TY", TimePeriodCategory::TaxYear, YearFormat::Fiscal),
    ("TYQ1", TimePeriodCategory::TaxYear, YearFormat::Fiscal),
    ("TYQ2", TimePeriodCategory::TaxYear, YearFormat::Fiscal),
    ("TYQ3", TimePeriodCategory::TaxYear, YearFormat::Fiscal),
    ("TYQ4", TimePeriodCategory::TaxYear, YearFormat::Fiscal),
    ("RY", TimePeriodCategory::ReportingYear, YearFormat::Reporting),
];

const MONTHS: u32 = 12;
const WEEKS: u32 = 53;

/// Look up a time period code (case-sensitive)
pub fn code_info(code: &str) -> Option<TimePeriodCodeInfo> {
    if code.is_empty() {
        return None;
    }

    if let Some((_, category, year_format)) = FIXED_CODES.iter().find(|(c, ..)| *c == code) {
        return Some(TimePeriodCodeInfo {
            category: *category,
            year_format: *year_format,
        });
    }

    let numbered = |prefix: &str, max: u32, category: TimePeriodCategory| {
        let n: u32 = code.strip_prefix(prefix)?.parse().ok()?;
        // Rejects `M01`, `M+1` and similar non-canonical spellings
        let canonical = (1..=max).contains(&n) && format!("{}{}", prefix, n) == code;
        canonical.then_some(TimePeriodCodeInfo {
            category,
            year_format: YearFormat::Calendar,
        })
    };

    numbered("M", MONTHS, TimePeriodCategory::Month)
        .or_else(|| numbered("W", WEEKS, TimePeriodCategory::Week))
}

/// Every time period code, in vocabulary order
pub static ALL_CODES: LazyLock<Vec<String>> = LazyLock::new(|| {
    let fixed = FIXED_CODES.iter().map(|(code, ..)| code.to_string());
    let months = (1..=MONTHS).map(|n| format!("M{}", n));
    let weeks = (1..=WEEKS).map(|n| format!("W{}", n));
    fixed.chain(months).chain(weeks).collect()
});

/// Codes that may be used with a year range period
pub static RANGE_CODES: LazyLock<Vec<String>> = LazyLock::new(|| {
    ALL_CODES
        .iter()
        .filter(|code| code_info(code).is_some_and(|info| info.year_format.is_range()))
        .cloned()
        .collect()
});

#[allow(clippy::expect_used)]
static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}$").expect("valid year pattern"));

#[allow(clippy::expect_used)]
static YEAR_RANGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{4})/([0-9]{4})$").expect("valid year range pattern"));

enum PeriodShape {
    Year(u32),
    Range,
}

fn period_shape(period: &str) -> Result<PeriodShape, FindingKind> {
    if period.contains('/') {
        let invalid = || FindingKind::InvalidYearRange {
            value: period.to_string(),
        };
        let captures = YEAR_RANGE_PATTERN.captures(period).ok_or_else(invalid)?;
        let start: u32 = captures[1].parse().map_err(|_| invalid())?;
        let end: u32 = captures[2].parse().map_err(|_| invalid())?;
        if end != start + 1 {
            return Err(invalid());
        }
        return Ok(PeriodShape::Range);
    }

    if !YEAR_PATTERN.is_match(period) {
        return Err(FindingKind::InvalidYear {
            value: period.to_string(),
        });
    }
    period
        .parse()
        .map(PeriodShape::Year)
        .map_err(|_| FindingKind::InvalidYear {
            value: period.to_string(),
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TimePeriod {
    pub period: String,
    pub code: String,
}

impl TimePeriod {
    pub fn new(period: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            period: period.into(),
            code: code.into(),
        }
    }

    /// Parse `PERIOD|CODE`, splitting on the last `|`
    ///
    /// Parsing only checks the shape; use [`TimePeriod::validate`] for the
    /// period and code rules.
    pub fn parse(s: &str) -> Result<Self, TimePeriodParseError> {
        let (period, code) = s
            .rsplit_once('|')
            .ok_or_else(|| TimePeriodParseError::Malformed(s.to_string()))?;
        Ok(Self::new(period, code))
    }

    pub fn code_info(&self) -> Option<TimePeriodCodeInfo> {
        code_info(&self.code)
    }

    /// Validate the period, the code and their combination
    ///
    /// Findings are reported at `Period` and `Code`.
    pub fn validate(&self) -> Findings {
        let mut findings = Findings::new();

        let shape = if self.period.is_empty() {
            findings.push("Period", FindingKind::NotEmpty);
            None
        } else {
            match period_shape(&self.period) {
                Ok(shape) => Some(shape),
                Err(kind) => {
                    findings.push("Period", kind);
                    None
                },
            }
        };

        let info = if self.code.is_empty() {
            findings.push("Code", FindingKind::NotEmpty);
            None
        } else {
            let info = self.code_info();
            if info.is_none() {
                findings.push(
                    "Code",
                    FindingKind::DisallowedCode {
                        value: self.code.clone(),
                        allowed: ALL_CODES.clone(),
                    },
                );
            }
            info
        };

        if let (Some(PeriodShape::Range), Some(info)) = (shape, info) {
            if !info.year_format.is_range() {
                findings.push(
                    "Code",
                    FindingKind::DisallowedCodeForPeriod {
                        value: self.code.clone(),
                        allowed: RANGE_CODES.clone(),
                    },
                );
            }
        }

        findings
    }

    /// The period in the canonical form for its code
    ///
    /// Academic and fiscal single years expand to `YYYY/YYYY+1`; ranges pass
    /// through. Other codes keep single years and reject ranges.
    pub fn parsed_period(&self) -> Result<String, TimePeriodParseError> {
        let info = self
            .code_info()
            .ok_or_else(|| TimePeriodParseError::UnknownCode(self.code.clone()))?;
        let invalid = || TimePeriodParseError::InvalidPeriod {
            period: self.period.clone(),
            code: self.code.clone(),
        };
        let shape = period_shape(&self.period).map_err(|_| invalid())?;

        match (shape, info.year_format.is_range()) {
            (PeriodShape::Year(year), true) => Ok(format!("{}/{}", year, year + 1)),
            (PeriodShape::Range, true) | (PeriodShape::Year(_), false) => {
                Ok(self.period.clone())
            },
            (PeriodShape::Range, false) => Err(invalid()),
        }
    }
}

impl std::fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}", self.period, self.code)
    }
}

impl std::str::FromStr for TimePeriod {
    type Err = TimePeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Validate a string-encoded time period, reporting every finding at the value itself
pub fn validate_encoded(value: &str) -> Findings {
    match TimePeriod::parse(value) {
        Ok(time_period) => time_period.validate().relocate(""),
        Err(_) => findings_of(Err(FindingKind::MalformedTimePeriodReference {
            value: value.to_string(),
        })),
    }
}
