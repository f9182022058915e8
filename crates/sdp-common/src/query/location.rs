//! Location references
//!
//! A location is identified by one of several level-specific identifier kinds.
//! On the wire it is either a JSON object (`{"level": "LA", "oldCode": "373"}`)
//! or the compact string `LEVEL|PROPERTY|VALUE` (`LA|oldCode|373`).
//!
//! # Examples
//!
//! ```
//! use sdp_common::query::location::LocationReference;
//!
//! let location = LocationReference::parse("NAT|id|12345").unwrap();
//! assert_eq!(location.level(), "NAT");
//! assert_eq!(location.key_value(), "12345");
//! assert_eq!(location.to_string(), "NAT|id|12345");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geographic_level::{self, GeographicLevel};
use crate::validation::{findings_of, validate_allowed, validate_text, FindingKind, Findings};

pub const ID_MAX_LENGTH: usize = 10;
pub const CODE_MAX_LENGTH: usize = 30;
pub const OLD_CODE_MAX_LENGTH: usize = 20;
pub const URN_MAX_LENGTH: usize = 20;
pub const LA_ESTAB_MAX_LENGTH: usize = 20;
pub const UKPRN_MAX_LENGTH: usize = 20;

/// Levels a generic `code` reference may use
pub const CODE_LEVELS: [&str; 2] = ["NAT", "REG"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocationParseError {
    #[error("location '{0}' must be in the format LEVEL|PROPERTY|VALUE")]
    Malformed(String),

    #[error("location property '{property}' is not supported for geographic level '{level}'")]
    UnsupportedLevelProperty { level: String, property: String },

    #[error("location must have exactly one of the properties: id, code, oldCode, urn, laEstab, ukprn")]
    AmbiguousProperty,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "LocationObject", into = "LocationObject")]
pub enum LocationReference {
    ById { level: String, id: String },
    ByCode { level: String, code: String },
    ByLocalAuthorityCode { code: String },
    ByLocalAuthorityOldCode { old_code: String },
    BySchoolUrn { urn: String },
    BySchoolLaEstab { la_estab: String },
    ByProviderUkprn { ukprn: String },
}

impl LocationReference {
    /// Every identifier property, in the order variants are declared
    pub const PROPERTIES: [&'static str; 6] = ["id", "code", "oldCode", "urn", "laEstab", "ukprn"];

    /// Parse the compact `LEVEL|PROPERTY|VALUE` form
    ///
    /// The value is kept verbatim (no trimming); length and emptiness are left
    /// to [`LocationReference::validate`].
    pub fn parse(s: &str) -> Result<Self, LocationParseError> {
        let segments: Vec<&str> = s.split('|').collect();
        let [level, property, value] = segments.as_slice() else {
            return Err(LocationParseError::Malformed(s.to_string()));
        };

        let unsupported = || LocationParseError::UnsupportedLevelProperty {
            level: level.to_string(),
            property: property.to_string(),
        };

        let level = GeographicLevel::from_code(level).ok_or_else(unsupported)?;
        Self::for_level(level, property, value.to_string()).ok_or_else(unsupported)
    }

    /// Build the variant for a recognised level and property
    fn for_level(level: GeographicLevel, property: &str, value: String) -> Option<Self> {
        let location = match (level, property) {
            (_, "id") => Self::ById {
                level: level.code().to_string(),
                id: value,
            },
            (GeographicLevel::Country | GeographicLevel::Region, "code") => Self::ByCode {
                level: level.code().to_string(),
                code: value,
            },
            (GeographicLevel::LocalAuthority, "code") => Self::ByLocalAuthorityCode { code: value },
            (GeographicLevel::LocalAuthority, "oldCode") => {
                Self::ByLocalAuthorityOldCode { old_code: value }
            },
            (GeographicLevel::School, "urn") => Self::BySchoolUrn { urn: value },
            (GeographicLevel::School, "laEstab") => Self::BySchoolLaEstab { la_estab: value },
            (GeographicLevel::Provider, "ukprn") => Self::ByProviderUkprn { ukprn: value },
            _ => return None,
        };
        Some(location)
    }

    /// Geographic level code this reference addresses
    pub fn level(&self) -> &str {
        match self {
            Self::ById { level, .. } | Self::ByCode { level, .. } => level,
            Self::ByLocalAuthorityCode { .. } | Self::ByLocalAuthorityOldCode { .. } => {
                GeographicLevel::LocalAuthority.code()
            },
            Self::BySchoolUrn { .. } | Self::BySchoolLaEstab { .. } => GeographicLevel::School.code(),
            Self::ByProviderUkprn { .. } => GeographicLevel::Provider.code(),
        }
    }

    /// Name of the identifying property; findings on the value are reported here
    pub fn key_property(&self) -> &'static str {
        match self {
            Self::ById { .. } => "id",
            Self::ByCode { .. } | Self::ByLocalAuthorityCode { .. } => "code",
            Self::ByLocalAuthorityOldCode { .. } => "oldCode",
            Self::BySchoolUrn { .. } => "urn",
            Self::BySchoolLaEstab { .. } => "laEstab",
            Self::ByProviderUkprn { .. } => "ukprn",
        }
    }

    pub fn key_value(&self) -> &str {
        match self {
            Self::ById { id, .. } => id,
            Self::ByCode { code, .. } | Self::ByLocalAuthorityCode { code } => code,
            Self::ByLocalAuthorityOldCode { old_code } => old_code,
            Self::BySchoolUrn { urn } => urn,
            Self::BySchoolLaEstab { la_estab } => la_estab,
            Self::ByProviderUkprn { ukprn } => ukprn,
        }
    }

    pub fn max_length(&self) -> usize {
        match self {
            Self::ById { .. } => ID_MAX_LENGTH,
            Self::ByCode { .. } | Self::ByLocalAuthorityCode { .. } => CODE_MAX_LENGTH,
            Self::ByLocalAuthorityOldCode { .. } => OLD_CODE_MAX_LENGTH,
            Self::BySchoolUrn { .. } => URN_MAX_LENGTH,
            Self::BySchoolLaEstab { .. } => LA_ESTAB_MAX_LENGTH,
            Self::ByProviderUkprn { .. } => UKPRN_MAX_LENGTH,
        }
    }

    /// Validate level membership and the identifier value
    ///
    /// Level findings are reported at `level`; value findings at the key
    /// property (`id`, `code`, `oldCode`, `urn`, `laEstab` or `ukprn`).
    pub fn validate(&self) -> Findings {
        let mut findings = Findings::new();

        let level_check = match self {
            Self::ById { level, .. } => geographic_level::validate_code(level),
            Self::ByCode { level, .. } => validate_allowed(level, &CODE_LEVELS),
            _ => Ok(()),
        };
        if let Err(kind) = level_check {
            findings.push("level", kind);
        }

        if let Err(kind) = validate_text(self.key_value(), self.max_length()) {
            findings.push(self.key_property(), kind);
        }

        findings
    }
}

impl std::fmt::Display for LocationReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}|{}", self.level(), self.key_property(), self.key_value())
    }
}

impl std::str::FromStr for LocationReference {
    type Err = LocationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Validate a string-encoded location, reporting every finding at the value itself
pub fn validate_encoded(value: &str) -> Findings {
    match LocationReference::parse(value) {
        Ok(location) => location.validate().relocate(""),
        Err(err) => findings_of(Err(FindingKind::MalformedLocationReference {
            value: value.to_string(),
            reason: err.to_string(),
        })),
    }
}

/// JSON object form of a location
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct LocationObject {
    level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    old_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    urn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    la_estab: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ukprn: Option<String>,
}

impl TryFrom<LocationObject> for LocationReference {
    type Error = LocationParseError;

    fn try_from(object: LocationObject) -> Result<Self, Self::Error> {
        let properties = [
            ("id", object.id),
            ("code", object.code),
            ("oldCode", object.old_code),
            ("urn", object.urn),
            ("laEstab", object.la_estab),
            ("ukprn", object.ukprn),
        ];
        let mut present = properties
            .into_iter()
            .filter_map(|(name, value)| value.map(|value| (name, value)));

        let (Some((property, value)), None) = (present.next(), present.next()) else {
            return Err(LocationParseError::AmbiguousProperty);
        };

        // `id` and `code` stay permissive about the level so an unknown level is
        // reported as a finding rather than a deserialization failure.
        let location = match property {
            "id" => Self::ById {
                level: object.level,
                id: value,
            },
            "code" if object.level == GeographicLevel::LocalAuthority.code() => {
                Self::ByLocalAuthorityCode { code: value }
            },
            "code" => Self::ByCode {
                level: object.level,
                code: value,
            },
            _ => GeographicLevel::from_code(&object.level)
                .and_then(|level| Self::for_level(level, property, value))
                .ok_or_else(|| LocationParseError::UnsupportedLevelProperty {
                    level: object.level.clone(),
                    property: property.to_string(),
                })?,
        };
        Ok(location)
    }
}

impl From<LocationReference> for LocationObject {
    fn from(location: LocationReference) -> Self {
        let mut object = LocationObject {
            level: location.level().to_string(),
            ..Default::default()
        };
        match location {
            LocationReference::ById { id, .. } => object.id = Some(id),
            LocationReference::ByCode { code, .. }
            | LocationReference::ByLocalAuthorityCode { code } => object.code = Some(code),
            LocationReference::ByLocalAuthorityOldCode { old_code } => {
                object.old_code = Some(old_code)
            },
            LocationReference::BySchoolUrn { urn } => object.urn = Some(urn),
            LocationReference::BySchoolLaEstab { la_estab } => object.la_estab = Some(la_estab),
            LocationReference::ByProviderUkprn { ukprn } => object.ukprn = Some(ukprn),
        }
        object
    }
}
