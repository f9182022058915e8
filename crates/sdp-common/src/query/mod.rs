//! The data set query criteria language
//!
//! Leaves first: compact value encodings ([`location`], [`time_period`],
//! [`sort`], [`geographic_level`]), leaf [`facet`]s, the recursive
//! [`criteria`] tree, and the [`request`] aggregates that bind them to
//! indicators, sorting and paging. Every layer validates exhaustively and
//! returns path-qualified [`Findings`](crate::validation::Findings).

pub mod criteria;
pub mod error;
pub mod facet;
pub mod geographic_level;
pub mod location;
pub mod request;
pub mod sort;
pub mod time_period;

pub use criteria::{Criteria, CriteriaAnd, CriteriaFacets, CriteriaNot, CriteriaOr};
pub use error::QueryError;
pub use facet::{OrderedQueryFacet, QueryFacet};
pub use geographic_level::GeographicLevel;
pub use location::{LocationParseError, LocationReference};
pub use request::get::DataSetGetQueryRequest;
pub use request::DataSetQueryRequest;
pub use sort::{Sort, SortDirection, SortParseError};
pub use time_period::{TimePeriod, TimePeriodParseError, YearFormat};
