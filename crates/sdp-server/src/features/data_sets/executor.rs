//! Query execution seam
//!
//! Validated requests are handed to a [`DataSetQueryExecutor`]. Storage and
//! result building live behind this trait; the HTTP layer only depends on it.

use std::sync::Arc;

use async_trait::async_trait;
use sdp_common::query::DataSetQueryRequest;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Paging information for a page of query results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagingViewModel {
    pub page: i64,
    pub page_size: i64,
    pub total_results: i64,
    pub total_pages: i64,
}

impl PagingViewModel {
    pub fn new(page: i64, page_size: i64, total_results: i64) -> Self {
        let total_pages = if page_size > 0 {
            (total_results + page_size - 1) / page_size
        } else {
            0
        };
        Self {
            page,
            page_size,
            total_results,
            total_pages,
        }
    }
}

/// A page of query results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSetQueryResponse {
    pub paging: PagingViewModel,
    pub results: Vec<serde_json::Value>,
}

/// Errors raised while executing a valid query
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Data set '{0}' not found")]
    NotFound(Uuid),

    #[error("Query execution unavailable: {0}")]
    Unavailable(String),

    #[error("Query execution failed: {0}")]
    Internal(String),
}

/// Runs validated queries against a data set
#[async_trait]
pub trait DataSetQueryExecutor: Send + Sync {
    async fn execute(
        &self,
        data_set_id: Uuid,
        request: DataSetQueryRequest,
    ) -> Result<DataSetQueryResponse, ExecutorError>;
}

pub type SharedExecutor = Arc<dyn DataSetQueryExecutor>;

/// Executor used when no query backend is wired in
///
/// Requests still go through validation, then fail with
/// [`ExecutorError::Unavailable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredExecutor;

#[async_trait]
impl DataSetQueryExecutor for UnconfiguredExecutor {
    async fn execute(
        &self,
        data_set_id: Uuid,
        _request: DataSetQueryRequest,
    ) -> Result<DataSetQueryResponse, ExecutorError> {
        tracing::warn!(%data_set_id, "No query executor configured");
        Err(ExecutorError::Unavailable(
            "no query executor is configured".to_string(),
        ))
    }
}
