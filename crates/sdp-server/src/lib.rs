//! SDP Server Library
//!
//! HTTP surface for data set queries.
//!
//! # Overview
//!
//! - **API Endpoints**: `POST`/`GET /api/v1/data-sets/:data_set_id/query` and
//!   `POST /api/v1/data-sets/:data_set_id/query/validate`
//! - **Validation**: Requests are checked with `sdp-common`; invalid requests
//!   are answered with `400` and the full list of findings
//! - **Execution**: Valid requests are forwarded to a
//!   [`features::data_sets::DataSetQueryExecutor`]
//! - **Configuration**: Environment-based configuration management
//! - **Middleware**: CORS and request logging
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use sdp_server::{api, config::Config, features::data_sets::UnconfiguredExecutor};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     api::serve(config, Arc::new(UnconfiguredExecutor)).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod features;
pub mod middleware;
