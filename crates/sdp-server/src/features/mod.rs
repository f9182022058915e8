//! Feature modules implementing the SDP API
//!
//! Each feature is organized as a vertical slice with its own queries and
//! routes.
//!
//! # Features
//!
//! - **data_sets**: Validate data set query requests and forward valid ones to
//!   the configured query executor
//!
//! # Architecture
//!
//! Each feature module follows the structure:
//! - `queries/` - Operations invoked by the routes
//! - `routes.rs` - HTTP route definitions and error mapping

pub mod data_sets;

use axum::Router;

use data_sets::SharedExecutor;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// Backend that runs validated data set queries
    pub executor: SharedExecutor,
}

/// Creates the main API router with all feature routes mounted
///
/// - `/data-sets` - Data set queries
pub fn router(state: FeatureState) -> Router<()> {
    Router::new().nest("/data-sets", data_sets::data_sets_routes().with_state(state.executor))
}
