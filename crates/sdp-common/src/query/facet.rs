//! Leaf facets
//!
//! A facet constrains one dimension of a data set (filters, geographic levels,
//! locations or time periods) with equality, negation and set-membership
//! operators. Time periods also support ordering through [`OrderedQueryFacet`].
//!
//! Facets are generic over their value type. The POST body carries structured
//! values (`LocationReference`, `TimePeriod`); the flattened GET request carries
//! their string encodings, which are parsed while converting between the two.

use serde::{Deserialize, Serialize};

use super::geographic_level;
use super::location::{self, LocationReference};
use super::time_period::{self, TimePeriod};
use crate::validation::{findings_of, validate_sequence, validate_text, FindingKind, Findings};

/// Maximum length of a filter option ID
pub const FILTER_MAX_LENGTH: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QueryFacet<V> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eq: Option<V>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_eq: Option<V>,
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub in_: Option<Vec<V>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_in: Option<Vec<V>>,
}

impl<V> Default for QueryFacet<V> {
    fn default() -> Self {
        Self {
            eq: None,
            not_eq: None,
            in_: None,
            not_in: None,
        }
    }
}

fn is_blank<V>(values: &Option<Vec<V>>) -> bool {
    values.as_ref().is_none_or(|values| values.is_empty())
}

fn validate_scalar<V>(
    findings: &mut Findings,
    name: &str,
    value: Option<&V>,
    rule: &impl Fn(&V) -> Findings,
) {
    if let Some(value) = value {
        findings.extend_nested(name, rule(value));
    }
}

fn try_map_all<V, U, E>(
    values: Option<Vec<V>>,
    f: &impl Fn(V) -> Result<U, E>,
) -> Result<Option<Vec<U>>, E> {
    values
        .map(|values| values.into_iter().map(f).collect::<Result<Vec<U>, E>>())
        .transpose()
}

impl<V> QueryFacet<V> {
    pub const FIELDS: [&'static str; 4] = ["Eq", "NotEq", "In", "NotIn"];

    pub fn with_eq(value: V) -> Self {
        Self {
            eq: Some(value),
            ..Default::default()
        }
    }

    pub fn with_in(values: Vec<V>) -> Self {
        Self {
            in_: Some(values),
            ..Default::default()
        }
    }

    /// True when no operator carries a value
    pub fn is_unconstrained(&self) -> bool {
        self.eq.is_none() && self.not_eq.is_none() && is_blank(&self.in_) && is_blank(&self.not_in)
    }

    /// Validate every operator, applying `rule` to each value
    pub fn validate_with(&self, rule: impl Fn(&V) -> Findings) -> Findings {
        let mut findings = Findings::new();

        if self.is_unconstrained() {
            for field in Self::FIELDS {
                findings.push(field, FindingKind::NotEmpty);
            }
            return findings;
        }

        self.validate_operators(&mut findings, &rule);
        findings
    }

    fn validate_operators(&self, findings: &mut Findings, rule: &impl Fn(&V) -> Findings) {
        validate_scalar(findings, "Eq", self.eq.as_ref(), rule);
        validate_scalar(findings, "NotEq", self.not_eq.as_ref(), rule);
        validate_sequence(findings, "In", self.in_.as_deref(), rule);
        validate_sequence(findings, "NotIn", self.not_in.as_deref(), rule);
    }

    /// Convert every value, stopping at the first failure
    pub fn try_map<U, E>(self, f: impl Fn(V) -> Result<U, E>) -> Result<QueryFacet<U>, E> {
        Ok(QueryFacet {
            eq: self.eq.map(&f).transpose()?,
            not_eq: self.not_eq.map(&f).transpose()?,
            in_: try_map_all(self.in_, &f)?,
            not_in: try_map_all(self.not_in, &f)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrderedQueryFacet<V> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eq: Option<V>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_eq: Option<V>,
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub in_: Option<Vec<V>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_in: Option<Vec<V>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gt: Option<V>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gte: Option<V>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lt: Option<V>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lte: Option<V>,
}

impl<V> Default for OrderedQueryFacet<V> {
    fn default() -> Self {
        Self {
            eq: None,
            not_eq: None,
            in_: None,
            not_in: None,
            gt: None,
            gte: None,
            lt: None,
            lte: None,
        }
    }
}

impl<V> OrderedQueryFacet<V> {
    pub const FIELDS: [&'static str; 8] = ["Eq", "NotEq", "In", "NotIn", "Gt", "Gte", "Lt", "Lte"];

    pub fn with_eq(value: V) -> Self {
        Self {
            eq: Some(value),
            ..Default::default()
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.eq.is_none()
            && self.not_eq.is_none()
            && is_blank(&self.in_)
            && is_blank(&self.not_in)
            && self.gt.is_none()
            && self.gte.is_none()
            && self.lt.is_none()
            && self.lte.is_none()
    }

    pub fn validate_with(&self, rule: impl Fn(&V) -> Findings) -> Findings {
        let mut findings = Findings::new();

        if self.is_unconstrained() {
            for field in Self::FIELDS {
                findings.push(field, FindingKind::NotEmpty);
            }
            return findings;
        }

        validate_scalar(&mut findings, "Eq", self.eq.as_ref(), &rule);
        validate_scalar(&mut findings, "NotEq", self.not_eq.as_ref(), &rule);
        validate_sequence(&mut findings, "In", self.in_.as_deref(), &rule);
        validate_sequence(&mut findings, "NotIn", self.not_in.as_deref(), &rule);
        validate_scalar(&mut findings, "Gt", self.gt.as_ref(), &rule);
        validate_scalar(&mut findings, "Gte", self.gte.as_ref(), &rule);
        validate_scalar(&mut findings, "Lt", self.lt.as_ref(), &rule);
        validate_scalar(&mut findings, "Lte", self.lte.as_ref(), &rule);
        findings
    }

    pub fn try_map<U, E>(self, f: impl Fn(V) -> Result<U, E>) -> Result<OrderedQueryFacet<U>, E> {
        Ok(OrderedQueryFacet {
            eq: self.eq.map(&f).transpose()?,
            not_eq: self.not_eq.map(&f).transpose()?,
            in_: try_map_all(self.in_, &f)?,
            not_in: try_map_all(self.not_in, &f)?,
            gt: self.gt.map(&f).transpose()?,
            gte: self.gte.map(&f).transpose()?,
            lt: self.lt.map(&f).transpose()?,
            lte: self.lte.map(&f).transpose()?,
        })
    }
}

// Value rules for each kind of facet. They take `&String` to fit
// `validate_with` on `QueryFacet<String>`.

#[allow(clippy::ptr_arg)]
pub fn filter_rule(value: &String) -> Findings {
    findings_of(validate_text(value, FILTER_MAX_LENGTH))
}

/// Report a blank value as `NotEmpty`, otherwise apply `rule`
fn unless_blank(value: &str, rule: impl FnOnce(&str) -> Findings) -> Findings {
    if value.trim().is_empty() {
        return Findings::single(FindingKind::NotEmpty);
    }
    rule(value)
}

#[allow(clippy::ptr_arg)]
pub fn geographic_level_rule(value: &String) -> Findings {
    unless_blank(value, |code| findings_of(geographic_level::validate_code(code)))
}

pub fn location_rule(value: &LocationReference) -> Findings {
    value.validate()
}

pub fn time_period_rule(value: &TimePeriod) -> Findings {
    value.validate()
}

#[allow(clippy::ptr_arg)]
pub fn encoded_location_rule(value: &String) -> Findings {
    unless_blank(value, location::validate_encoded)
}

#[allow(clippy::ptr_arg)]
pub fn encoded_time_period_rule(value: &String) -> Findings {
    unless_blank(value, time_period::validate_encoded)
}

pub type FilterFacet = QueryFacet<String>;
pub type GeographicLevelFacet = QueryFacet<String>;
pub type LocationFacet = QueryFacet<LocationReference>;
pub type TimePeriodFacet = OrderedQueryFacet<TimePeriod>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_unconstrained_facet_reports_every_field() {
        let facet = QueryFacet::<String>::default();
        assert_eq!(facet.validate_with(filter_rule).paths(), vec!["Eq", "NotEq", "In", "NotIn"]);

        let facet = QueryFacet::<String> {
            in_: Some(vec![]),
            not_in: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(facet.validate_with(filter_rule).len(), 4);

        let facet = OrderedQueryFacet::<TimePeriod>::default();
        let findings = facet.validate_with(time_period_rule);
        assert_eq!(findings.len(), 8);
        assert!(findings.iter().all(|f| f.kind == FindingKind::NotEmpty));
    }

    #[test]
    fn test_filter_values() {
        let facet = QueryFacet::with_eq(String::new());
        let findings = facet.validate_with(filter_rule).into_vec();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].path, "Eq");
        assert_eq!(findings[0].kind, FindingKind::NotEmpty);

        let facet = QueryFacet {
            not_eq: Some("x".repeat(11)),
            in_: Some(strings(&["ok", "", "x".repeat(11).as_str()])),
            not_in: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(
            facet.validate_with(filter_rule).paths(),
            vec!["NotEq", "In[1]", "In[2]", "NotIn"]
        );
    }

    #[test]
    fn test_geographic_level_values() {
        let facet = QueryFacet::with_in(strings(&["NAT", "nat", "XYZ"]));
        let findings = facet.validate_with(geographic_level_rule).into_vec();
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].path, "In[1]");
        assert_eq!(findings[0].kind.code(), "AllowedValue");
    }

    #[test]
    fn test_location_values_nest_properties() {
        let facet = QueryFacet::with_eq(LocationReference::ById {
            level: "XYZ".to_string(),
            id: String::new(),
        });
        assert_eq!(facet.validate_with(location_rule).paths(), vec!["Eq.level", "Eq.id"]);
    }

    #[test]
    fn test_time_period_ordering_operators() {
        let facet = OrderedQueryFacet {
            gte: Some(TimePeriod::new("2020", "AY")),
            lt: Some(TimePeriod::new("2021/2022", "CY")),
            ..Default::default()
        };
        assert_eq!(facet.validate_with(time_period_rule).paths(), vec!["Lt.Code"]);
    }

    #[test]
    fn test_encoded_values_report_at_value_path() {
        let facet = QueryFacet::with_in(strings(&["NAT|id|1", "NAT|id", "NAT|id|"]));
        let findings = facet.validate_with(encoded_location_rule).into_vec();
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].path, "In[1]");
        assert_eq!(findings[0].kind.code(), "LocationFormat");
        assert_eq!(findings[1].path, "In[2]");
        assert_eq!(findings[1].kind, FindingKind::NotEmpty);

        let facet = OrderedQueryFacet::with_eq("2021/2022|CY".to_string());
        let findings = facet.validate_with(encoded_time_period_rule).into_vec();
        assert_eq!(findings[0].path, "Eq");
        assert_eq!(findings[0].kind.code(), "TimePeriodAllowedCodeForRange");
    }

    #[test]
    fn test_blank_values_are_required() {
        let rules: [(&str, fn(&String) -> Findings); 4] = [
            ("filter", filter_rule),
            ("geographic level", geographic_level_rule),
            ("location", encoded_location_rule),
            ("time period", encoded_time_period_rule),
        ];
        for (name, rule) in rules {
            let facet = QueryFacet::with_eq("  ".to_string());
            let findings = facet.validate_with(rule).into_vec();
            assert_eq!(findings.len(), 1, "{}", name);
            assert_eq!(findings[0].path, "Eq", "{}", name);
            assert_eq!(findings[0].kind, FindingKind::NotEmpty, "{}", name);

            let facet = QueryFacet::with_in(strings(&["", " "]));
            let findings = facet.validate_with(rule).into_vec();
            assert_eq!(
                findings.iter().map(|f| (f.path.as_str(), f.kind.code())).collect::<Vec<_>>(),
                vec![("In[0]", "NotEmpty"), ("In[1]", "NotEmpty")],
                "{}",
                name
            );
        }

        let facet = QueryFacet::with_in(strings(&["NAT", " "]));
        let findings = facet.validate_with(geographic_level_rule).into_vec();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].path, "In[1]");
        assert_eq!(findings[0].kind, FindingKind::NotEmpty);

        let facet = OrderedQueryFacet {
            in_: Some(strings(&["2020|AY", ""])),
            ..Default::default()
        };
        let findings = facet.validate_with(encoded_time_period_rule).into_vec();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].path, "In[1]");
        assert_eq!(findings[0].kind, FindingKind::NotEmpty);
    }

    #[test]
    fn test_try_map() {
        let facet = QueryFacet {
            eq: Some("NAT|id|1".to_string()),
            not_in: Some(strings(&["LA|oldCode|373"])),
            ..Default::default()
        };
        let mapped = facet.try_map(|s| LocationReference::parse(&s)).unwrap();
        assert_eq!(mapped.eq.unwrap().level(), "NAT");
        assert_eq!(mapped.not_in.unwrap()[0].key_property(), "oldCode");

        let facet = QueryFacet::with_in(strings(&["NAT|id|1", "bad"]));
        assert!(facet.try_map(|s| LocationReference::parse(&s)).is_err());
    }

    #[test]
    fn test_deserialize() {
        let facet: FilterFacet = serde_json::from_str(r#"{"eq": "a", "in": ["b", "c"]}"#).unwrap();
        assert_eq!(facet.eq.as_deref(), Some("a"));
        assert_eq!(facet.in_.unwrap().len(), 2);

        let facet: TimePeriodFacet =
            serde_json::from_str(r#"{"gte": {"period": "2020", "code": "AY"}}"#).unwrap();
        assert!(facet.gte.is_some());

        assert!(serde_json::from_str::<FilterFacet>(r#"{"gt": "a"}"#).is_err());
    }
}
