//! Criteria trees
//!
//! Criteria combine facet constraints with boolean algebra. On the wire each
//! node is a JSON object distinguished by its keys:
//!
//! ```json
//! { "and": [ { "filters": { "eq": "abc" } }, { "not": { "geographicLevels": { "eq": "LA" } } } ] }
//! ```
//!
//! Validation walks the whole tree and reports every problem with its path
//! (`And[1].Not.GeographicLevels.Eq`).

use serde::{Deserialize, Serialize};

use super::facet::{
    filter_rule, geographic_level_rule, location_rule, time_period_rule, FilterFacet,
    GeographicLevelFacet, LocationFacet, TimePeriodFacet,
};
use crate::validation::{indexed, FindingKind, Findings};

/// A node of a criteria tree
///
/// Variant order matters for deserialization: `{}` must resolve to an
/// unconstrained [`CriteriaFacets`] node, and the facet node rejects the
/// `and`, `or` and `not` keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Criteria {
    And(CriteriaAnd),
    Or(CriteriaOr),
    Facets(CriteriaFacets),
    Not(CriteriaNot),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CriteriaAnd {
    pub and: Vec<Option<Criteria>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CriteriaOr {
    pub or: Vec<Option<Criteria>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CriteriaNot {
    pub not: Option<Box<Criteria>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CriteriaFacets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<FilterFacet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geographic_levels: Option<GeographicLevelFacet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<LocationFacet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_periods: Option<TimePeriodFacet>,
}

impl CriteriaFacets {
    /// True when no facet is present; such a node matches everything
    pub fn is_empty(&self) -> bool {
        self.filters.is_none()
            && self.geographic_levels.is_none()
            && self.locations.is_none()
            && self.time_periods.is_none()
    }

    pub fn validate(&self) -> Findings {
        let mut findings = Findings::new();
        if let Some(facet) = &self.filters {
            findings.extend_nested("Filters", facet.validate_with(filter_rule));
        }
        if let Some(facet) = &self.geographic_levels {
            findings.extend_nested("GeographicLevels", facet.validate_with(geographic_level_rule));
        }
        if let Some(facet) = &self.locations {
            findings.extend_nested("Locations", facet.validate_with(location_rule));
        }
        if let Some(facet) = &self.time_periods {
            findings.extend_nested("TimePeriods", facet.validate_with(time_period_rule));
        }
        findings
    }
}

fn validate_children(findings: &mut Findings, name: &str, children: &[Option<Criteria>]) {
    if children.is_empty() {
        findings.push(name, FindingKind::NotEmpty);
        return;
    }

    for (idx, child) in children.iter().enumerate() {
        let path = indexed(name, idx);
        match child {
            Some(child) => findings.extend_nested(&path, child.validate()),
            None => findings.push(path, FindingKind::NotEmpty),
        }
    }
}

impl Criteria {
    pub fn and(children: impl IntoIterator<Item = Criteria>) -> Self {
        Criteria::And(CriteriaAnd {
            and: children.into_iter().map(Some).collect(),
        })
    }

    pub fn or(children: impl IntoIterator<Item = Criteria>) -> Self {
        Criteria::Or(CriteriaOr {
            or: children.into_iter().map(Some).collect(),
        })
    }

    pub fn not(child: Criteria) -> Self {
        Criteria::Not(CriteriaNot {
            not: Some(Box::new(child)),
        })
    }

    pub fn facets(facets: CriteriaFacets) -> Self {
        Criteria::Facets(facets)
    }

    /// Validate the whole tree, depth-first, without stopping at the first problem
    pub fn validate(&self) -> Findings {
        let mut findings = Findings::new();
        match self {
            Criteria::And(node) => validate_children(&mut findings, "And", &node.and),
            Criteria::Or(node) => validate_children(&mut findings, "Or", &node.or),
            Criteria::Not(node) => match &node.not {
                Some(child) => findings.extend_nested("Not", child.validate()),
                None => findings.push("Not", FindingKind::NotEmpty),
            },
            Criteria::Facets(facets) => findings.extend_nested("", facets.validate()),
        }
        findings
    }
}

impl From<CriteriaFacets> for Criteria {
    fn from(facets: CriteriaFacets) -> Self {
        Criteria::Facets(facets)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::query::facet::QueryFacet;

    fn filter_eq(value: &str) -> Criteria {
        Criteria::facets(CriteriaFacets {
            filters: Some(QueryFacet::with_eq(value.to_string())),
            ..Default::default()
        })
    }

    #[test]
    fn test_deserialize_variants() {
        let criteria: Criteria = serde_json::from_str(r#"{"and": [{"filters": {"eq": "a"}}]}"#).unwrap();
        assert!(matches!(criteria, Criteria::And(_)));

        let criteria: Criteria = serde_json::from_str(r#"{"or": []}"#).unwrap();
        assert!(matches!(criteria, Criteria::Or(_)));

        let criteria: Criteria = serde_json::from_str(r#"{"not": {"filters": {"eq": "a"}}}"#).unwrap();
        assert!(matches!(criteria, Criteria::Not(_)));

        let criteria: Criteria = serde_json::from_str(r#"{"not": null}"#).unwrap();
        assert_eq!(criteria, Criteria::Not(CriteriaNot { not: None }));

        let criteria: Criteria = serde_json::from_str("{}").unwrap();
        assert_eq!(criteria, Criteria::Facets(CriteriaFacets::default()));
    }

    #[test]
    fn test_deserialize_rejects_unknown_keys() {
        for json in [
            r#"{"xor": []}"#,
            r#"{"and": [], "or": []}"#,
            r#"{"filters": {"eq": "a"}, "not": null}"#,
        ] {
            assert!(serde_json::from_str::<Criteria>(json).is_err(), "{}", json);
        }
    }

    #[test]
    fn test_serialize_round_trips() {
        let criteria = Criteria::or([
            filter_eq("a"),
            Criteria::not(Criteria::and([filter_eq("b")])),
        ]);
        let json = serde_json::to_string(&criteria).unwrap();
        assert_eq!(
            json,
            r#"{"or":[{"filters":{"eq":"a"}},{"not":{"and":[{"filters":{"eq":"b"}}]}}]}"#
        );
        assert_eq!(serde_json::from_str::<Criteria>(&json).unwrap(), criteria);
    }

    #[test]
    fn test_empty_facets_node_is_valid() {
        assert!(Criteria::facets(CriteriaFacets::default()).validate().is_empty());
    }

    #[test]
    fn test_empty_and_or() {
        let findings = Criteria::and([]).validate().into_vec();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].path, "And");
        assert_eq!(findings[0].kind, FindingKind::NotEmpty);

        assert_eq!(Criteria::or([]).validate().paths(), vec!["Or"]);
    }

    #[test]
    fn test_absent_children() {
        let criteria = Criteria::And(CriteriaAnd {
            and: vec![Some(filter_eq("a")), None],
        });
        assert_eq!(criteria.validate().paths(), vec!["And[1]"]);

        let criteria = Criteria::Not(CriteriaNot { not: None });
        assert_eq!(criteria.validate().paths(), vec!["Not"]);
    }

    #[test]
    fn test_nested_paths() {
        let criteria = Criteria::not(Criteria::and([filter_eq(&"x".repeat(11))]));
        let findings = criteria.validate().into_vec();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].path, "Not.And[0].Filters.Eq");
        assert_eq!(findings[0].kind, FindingKind::MaxLength { max_length: 10 });
    }

    #[test]
    fn test_findings_accumulate_across_branches() {
        let criteria = Criteria::or([
            filter_eq(""),
            Criteria::and([filter_eq("ok"), filter_eq("")]),
            Criteria::Not(CriteriaNot { not: None }),
        ]);
        assert_eq!(
            criteria.validate().paths(),
            vec!["Or[0].Filters.Eq", "Or[1].And[1].Filters.Eq", "Or[2].Not"]
        );
    }
}
