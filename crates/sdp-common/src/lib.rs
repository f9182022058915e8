//! SDP Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! The statistics data platform's query criteria language, shared by the
//! server and the CLI.
//!
//! - **Query**: value encodings, facets, criteria trees and request aggregates
//! - **Validation**: path-qualified findings and the shared value rules
//! - **Logging**: `tracing` subscriber setup from `LOG_*` configuration
//!
//! # Example
//!
//! ```
//! use sdp_common::query::DataSetQueryRequest;
//!
//! let request = DataSetQueryRequest::from_json(
//!     r#"{"criteria": {"filters": {"eq": ""}}, "page": 0}"#,
//! )?;
//! let findings = request.validate();
//! assert_eq!(findings.paths(), vec!["Criteria.Filters.Eq", "Page"]);
//! # Ok::<(), sdp_common::SdpError>(())
//! ```

pub mod error;
pub mod logging;
pub mod query;
pub mod validation;

pub use error::{Result, SdpError};
pub use validation::{Finding, FindingKind, Findings};
