//! Geographic levels
//!
//! The fixed vocabulary of location granularities a data set can be broken down
//! by. Each level is addressed on the wire by a short uppercase code.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::FindingKind;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown geographic level code '{0}'")]
pub struct UnknownGeographicLevel(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeographicLevel {
    #[serde(rename = "EDA")]
    EnglishDevolvedArea,
    #[serde(rename = "INST")]
    Institution,
    #[serde(rename = "LA")]
    LocalAuthority,
    #[serde(rename = "LAD")]
    LocalAuthorityDistrict,
    #[serde(rename = "LEP")]
    LocalEnterprisePartnership,
    #[serde(rename = "LSIP")]
    LocalSkillsImprovementPlanArea,
    #[serde(rename = "MCA")]
    MayoralCombinedAuthority,
    #[serde(rename = "MAT")]
    MultiAcademyTrust,
    #[serde(rename = "NAT")]
    Country,
    #[serde(rename = "OA")]
    OpportunityArea,
    #[serde(rename = "PCON")]
    ParliamentaryConstituency,
    #[serde(rename = "PA")]
    PlanningArea,
    #[serde(rename = "PFA")]
    PoliceForceArea,
    #[serde(rename = "PROV")]
    Provider,
    #[serde(rename = "REG")]
    Region,
    #[serde(rename = "RSC")]
    RscRegion,
    #[serde(rename = "SCH")]
    School,
    #[serde(rename = "SPON")]
    Sponsor,
    #[serde(rename = "WARD")]
    Ward,
}

impl GeographicLevel {
    pub const ALL: [GeographicLevel; 19] = [
        GeographicLevel::EnglishDevolvedArea,
        GeographicLevel::Institution,
        GeographicLevel::LocalAuthority,
        GeographicLevel::LocalAuthorityDistrict,
        GeographicLevel::LocalEnterprisePartnership,
        GeographicLevel::LocalSkillsImprovementPlanArea,
        GeographicLevel::MayoralCombinedAuthority,
        GeographicLevel::MultiAcademyTrust,
        GeographicLevel::Country,
        GeographicLevel::OpportunityArea,
        GeographicLevel::ParliamentaryConstituency,
        GeographicLevel::PlanningArea,
        GeographicLevel::PoliceForceArea,
        GeographicLevel::Provider,
        GeographicLevel::Region,
        GeographicLevel::RscRegion,
        GeographicLevel::School,
        GeographicLevel::Sponsor,
        GeographicLevel::Ward,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            GeographicLevel::EnglishDevolvedArea => "EDA",
            GeographicLevel::Institution => "INST",
            GeographicLevel::LocalAuthority => "LA",
            GeographicLevel::LocalAuthorityDistrict => "LAD",
            GeographicLevel::LocalEnterprisePartnership => "LEP",
            GeographicLevel::LocalSkillsImprovementPlanArea => "LSIP",
            GeographicLevel::MayoralCombinedAuthority => "MCA",
            GeographicLevel::MultiAcademyTrust => "MAT",
            GeographicLevel::Country => "NAT",
            GeographicLevel::OpportunityArea => "OA",
            GeographicLevel::ParliamentaryConstituency => "PCON",
            GeographicLevel::PlanningArea => "PA",
            GeographicLevel::PoliceForceArea => "PFA",
            GeographicLevel::Provider => "PROV",
            GeographicLevel::Region => "REG",
            GeographicLevel::RscRegion => "RSC",
            GeographicLevel::School => "SCH",
            GeographicLevel::Sponsor => "SPON",
            GeographicLevel::Ward => "WARD",
        }
    }

    /// Look up a level by its exact (case-sensitive) code
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.code() == code)
    }

    /// Every level code, in declaration order
    pub fn codes() -> Vec<&'static str> {
        Self::ALL.iter().map(|level| level.code()).collect()
    }
}

impl std::str::FromStr for GeographicLevel {
    type Err = UnknownGeographicLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| UnknownGeographicLevel(s.to_string()))
    }
}

impl std::fmt::Display for GeographicLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Validate a geographic level code against the full vocabulary
pub fn validate_code(code: &str) -> Result<(), FindingKind> {
    crate::validation::validate_allowed(code, &GeographicLevel::codes())
}
