//! Flattened GET query requests
//!
//! A GET query carries a single facet node as URL parameters:
//!
//! ```text
//! ?filters.eq=abc&locations.in=NAT|id|1,LA|oldCode|373&timePeriods.gte=2020|AY&page=2
//! ```
//!
//! Locations, time periods and sorts use their compact string forms. They are
//! validated as strings and only parsed when converting into a
//! [`DataSetQueryRequest`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{validate_indicators, validate_paging, DataSetQueryRequest, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use crate::query::criteria::{Criteria, CriteriaFacets};
use crate::query::error::QueryError;
use crate::query::facet::{
    encoded_location_rule, encoded_time_period_rule, filter_rule, geographic_level_rule,
    OrderedQueryFacet, QueryFacet,
};
use crate::query::location::LocationReference;
use crate::query::sort::{self, Sort};
use crate::query::time_period::TimePeriod;
use crate::validation::{validate_sequence, Findings};

/// Maximum length of an indicator ID in a GET query
pub const INDICATOR_MAX_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DataSetGetQueryRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<QueryFacet<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geographic_levels: Option<QueryFacet<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<QueryFacet<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_periods: Option<OrderedQueryFacet<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indicators: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorts: Option<Vec<String>>,

    #[serde(default)]
    pub debug: bool,

    #[serde(default = "super::default_page")]
    pub page: i64,

    #[serde(default = "super::default_page_size")]
    pub page_size: i64,
}

impl Default for DataSetGetQueryRequest {
    fn default() -> Self {
        Self {
            filters: None,
            geographic_levels: None,
            locations: None,
            time_periods: None,
            indicators: None,
            sorts: None,
            debug: false,
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl DataSetGetQueryRequest {
    pub fn validate(&self) -> Findings {
        let mut findings = Findings::new();

        if let Some(facet) = &self.filters {
            findings.extend_nested("Filters", facet.validate_with(filter_rule));
        }
        if let Some(facet) = &self.geographic_levels {
            findings.extend_nested("GeographicLevels", facet.validate_with(geographic_level_rule));
        }
        if let Some(facet) = &self.locations {
            findings.extend_nested("Locations", facet.validate_with(encoded_location_rule));
        }
        if let Some(facet) = &self.time_periods {
            findings.extend_nested("TimePeriods", facet.validate_with(encoded_time_period_rule));
        }

        validate_indicators(&mut findings, self.indicators.as_deref(), INDICATOR_MAX_LENGTH);

        validate_sequence(&mut findings, "Sorts", self.sorts.as_deref(), |s: &String| {
            sort::validate_encoded(s)
        });

        validate_paging(&mut findings, self.page, self.page_size);

        findings
    }

    /// Convert into the equivalent POST request
    ///
    /// The facets become a single facet criteria node (or no criteria when none
    /// are given). Fails with [`QueryError::Invalid`] if the request has findings.
    pub fn to_query_request(&self) -> Result<DataSetQueryRequest, QueryError> {
        let findings = self.validate();
        if !findings.is_empty() {
            debug!(count = findings.len(), "GET query request has validation findings");
            return Err(QueryError::Invalid(findings));
        }

        let facets = CriteriaFacets {
            filters: self.filters.clone(),
            geographic_levels: self.geographic_levels.clone(),
            locations: self
                .locations
                .clone()
                .map(|facet| facet.try_map(|s| LocationReference::parse(&s)))
                .transpose()?,
            time_periods: self
                .time_periods
                .clone()
                .map(|facet| facet.try_map(|s| TimePeriod::parse(&s)))
                .transpose()?,
        };

        let sorts = self
            .sorts
            .as_ref()
            .map(|sorts| {
                sorts
                    .iter()
                    .map(|s| Sort::parse(s).map(Some))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        Ok(DataSetQueryRequest {
            criteria: (!facets.is_empty()).then_some(Criteria::Facets(facets)),
            indicators: self.indicators.clone(),
            sorts,
            debug: self.debug,
            page: self.page,
            page_size: self.page_size,
        })
    }

    /// Build a request from decoded URL query pairs
    ///
    /// List parameters (`*.in`, `*.notIn`, `indicators`, `sorts`) accept both
    /// repeated keys and comma-separated values. Scalar parameters must appear
    /// at most once.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut request = Self::default();
        let mut seen_debug = false;
        let mut seen_page = false;
        let mut seen_page_size = false;

        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());

            match key.split_once('.') {
                Some(("filters", op)) => {
                    apply_op(request.filters.get_or_insert_with(Default::default), key, op, value)?
                },
                Some(("geographicLevels", op)) => apply_op(
                    request.geographic_levels.get_or_insert_with(Default::default),
                    key,
                    op,
                    value,
                )?,
                Some(("locations", op)) => {
                    apply_op(request.locations.get_or_insert_with(Default::default), key, op, value)?
                },
                Some(("timePeriods", op)) => apply_ordered_op(
                    request.time_periods.get_or_insert_with(Default::default),
                    key,
                    op,
                    value,
                )?,
                Some(_) => return Err(unknown_parameter(key)),
                None => match key {
                    "indicators" => extend_list(&mut request.indicators, value),
                    "sorts" => extend_list(&mut request.sorts, value),
                    "debug" => {
                        ensure_once(&mut seen_debug, key)?;
                        request.debug = parse_value(key, value)?;
                    },
                    "page" => {
                        ensure_once(&mut seen_page, key)?;
                        request.page = parse_value(key, value)?;
                    },
                    "pageSize" => {
                        ensure_once(&mut seen_page_size, key)?;
                        request.page_size = parse_value(key, value)?;
                    },
                    _ => return Err(unknown_parameter(key)),
                },
            }
        }

        Ok(request)
    }

    /// Build a request from a raw (percent-encoded) query string
    pub fn from_query_string(query: &str) -> Result<Self, QueryError> {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_query_pairs(url::form_urlencoded::parse(query.as_bytes()))
    }
}

fn unknown_parameter(key: &str) -> QueryError {
    QueryError::invalid_parameter(key, "unknown query parameter")
}

fn ensure_once(seen: &mut bool, key: &str) -> Result<(), QueryError> {
    if std::mem::replace(seen, true) {
        return Err(QueryError::invalid_parameter(key, "must not be repeated"));
    }
    Ok(())
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, QueryError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|err: T::Err| QueryError::invalid_parameter(key, err.to_string()))
}

fn set_scalar(slot: &mut Option<String>, key: &str, value: &str) -> Result<(), QueryError> {
    if slot.is_some() {
        return Err(QueryError::invalid_parameter(key, "must not be repeated"));
    }
    *slot = Some(value.to_string());
    Ok(())
}

fn extend_list(slot: &mut Option<Vec<String>>, value: &str) {
    slot.get_or_insert_with(Vec::new)
        .extend(value.split(',').map(str::to_string));
}

fn apply_op(facet: &mut QueryFacet<String>, key: &str, op: &str, value: &str) -> Result<(), QueryError> {
    match op {
        "eq" => set_scalar(&mut facet.eq, key, value),
        "notEq" => set_scalar(&mut facet.not_eq, key, value),
        "in" => {
            extend_list(&mut facet.in_, value);
            Ok(())
        },
        "notIn" => {
            extend_list(&mut facet.not_in, value);
            Ok(())
        },
        _ => Err(unknown_parameter(key)),
    }
}

fn apply_ordered_op(
    facet: &mut OrderedQueryFacet<String>,
    key: &str,
    op: &str,
    value: &str,
) -> Result<(), QueryError> {
    match op {
        "eq" => set_scalar(&mut facet.eq, key, value),
        "notEq" => set_scalar(&mut facet.not_eq, key, value),
        "gt" => set_scalar(&mut facet.gt, key, value),
        "gte" => set_scalar(&mut facet.gte, key, value),
        "lt" => set_scalar(&mut facet.lt, key, value),
        "lte" => set_scalar(&mut facet.lte, key, value),
        "in" => {
            extend_list(&mut facet.in_, value);
            Ok(())
        },
        "notIn" => {
            extend_list(&mut facet.not_in, value);
            Ok(())
        },
        _ => Err(unknown_parameter(key)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::validation::FindingKind;

    #[test]
    fn test_from_query_string() {
        let request = DataSetGetQueryRequest::from_query_string(
            "?filters.eq=abc&locations.in=NAT%7Cid%7C1,LA|oldCode|373&locations.in=REG|code|E1\
             &timePeriods.gte=2020|AY&indicators=a,b&sorts=timePeriod|Desc&page=2&pageSize=50&debug=true",
        )
        .unwrap();

        assert_eq!(request.filters.unwrap().eq.as_deref(), Some("abc"));
        assert_eq!(
            request.locations.unwrap().in_.unwrap(),
            vec!["NAT|id|1", "LA|oldCode|373", "REG|code|E1"]
        );
        assert_eq!(request.time_periods.unwrap().gte.as_deref(), Some("2020|AY"));
        assert_eq!(request.indicators.unwrap(), vec!["a", "b"]);
        assert_eq!(request.sorts.unwrap(), vec!["timePeriod|Desc"]);
        assert_eq!(request.page, 2);
        assert_eq!(request.page_size, 50);
        assert!(request.debug);
    }

    #[test]
    fn test_from_query_string_defaults() {
        let request = DataSetGetQueryRequest::from_query_string("").unwrap();
        assert_eq!(request, DataSetGetQueryRequest::default());
    }

    #[test]
    fn test_from_query_string_errors() {
        for (query, key) in [
            ("colour=red", "colour"),
            ("filters.gt=a", "filters.gt"),
            ("regions.eq=a", "regions.eq"),
            ("page=two", "page"),
            ("page=1&page=2", "page"),
            ("debug=yes", "debug"),
            ("filters.eq=a&filters.eq=b", "filters.eq"),
        ] {
            match DataSetGetQueryRequest::from_query_string(query) {
                Err(QueryError::InvalidParameter { key: actual, .. }) => {
                    assert_eq!(actual, key, "{}", query)
                },
                other => panic!("{}: unexpected result {:?}", query, other),
            }
        }
    }

    #[test]
    fn test_validate_reports_string_findings_at_value_path() {
        let request = DataSetGetQueryRequest::from_query_string(
            "locations.eq=NAT|id&timePeriods.in=2020|AY,2020/2021|CY&sorts=x|Up&indicators=",
        )
        .unwrap();
        let findings = request.validate().into_vec();
        let paths: Vec<&str> = findings.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["Locations.Eq", "TimePeriods.In[1]", "Indicators[0]", "Sorts[0]"]
        );
        assert_eq!(findings[0].kind.code(), "LocationFormat");
        assert_eq!(findings[1].kind.code(), "TimePeriodAllowedCodeForRange");
        assert_eq!(findings[2].kind, FindingKind::NotEmpty);
        assert_eq!(findings[3].kind.code(), "AllowedValue");
    }

    #[test]
    fn test_blank_values_are_required() {
        let request = DataSetGetQueryRequest::from_query_string(
            "locations.eq=&timePeriods.in=2020|AY,&sorts=",
        )
        .unwrap();
        let findings = request.validate().into_vec();
        let paths: Vec<&str> = findings.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["Locations.Eq", "TimePeriods.In[1]", "Sorts[0]"]);
        assert!(findings.iter().all(|f| f.kind == FindingKind::NotEmpty));
    }

    #[test]
    fn test_indicator_limit_is_wider_than_post() {
        let request = DataSetGetQueryRequest {
            indicators: Some(vec!["x".repeat(100)]),
            ..Default::default()
        };
        assert!(request.validate().is_empty());

        let request = DataSetGetQueryRequest {
            indicators: Some(vec!["x".repeat(101)]),
            ..Default::default()
        };
        assert_eq!(request.validate().paths(), vec!["Indicators[0]"]);
    }

    #[test]
    fn test_to_query_request() {
        let request = DataSetGetQueryRequest::from_query_string(
            "geographicLevels.eq=LA&locations.notIn=LA|oldCode|373&timePeriods.lt=2021|CY&sorts=timePeriod|Asc",
        )
        .unwrap();
        let query = request.to_query_request().unwrap();

        let Some(Criteria::Facets(facets)) = &query.criteria else {
            panic!("expected a facet criteria node, got {:?}", query.criteria);
        };
        assert_eq!(facets.geographic_levels.as_ref().unwrap().eq.as_deref(), Some("LA"));
        assert_eq!(
            facets.locations.as_ref().unwrap().not_in.as_ref().unwrap()[0],
            LocationReference::ByLocalAuthorityOldCode {
                old_code: "373".to_string()
            }
        );
        assert_eq!(
            facets.time_periods.as_ref().unwrap().lt,
            Some(TimePeriod::new("2021", "CY"))
        );
        assert_eq!(query.sorts.as_ref().unwrap()[0].as_ref().unwrap().field, "timePeriod");
        assert!(query.validate().is_empty());
    }

    #[test]
    fn test_to_query_request_without_facets() {
        let query = DataSetGetQueryRequest::from_query_string("indicators=a")
            .unwrap()
            .to_query_request()
            .unwrap();
        assert_eq!(query.criteria, None);
        assert_eq!(query.indicators, Some(vec!["a".to_string()]));
    }

    #[test]
    fn test_to_query_request_invalid() {
        let request = DataSetGetQueryRequest::from_query_string("locations.eq=SCH|code|1&page=0").unwrap();
        let err = request.to_query_request().unwrap_err();
        assert_eq!(err.findings().unwrap().paths(), vec!["Locations.Eq", "Page"]);
    }
}
