//! Query a data set
//!
//! Validates a POST body or a flattened GET query string, then forwards the
//! resulting request to the configured executor.

use sdp_common::query::{DataSetGetQueryRequest, DataSetQueryRequest, QueryError};
use thiserror::Error;
use uuid::Uuid;

use crate::features::data_sets::executor::{
    DataSetQueryExecutor, DataSetQueryResponse, ExecutorError,
};

/// Errors that can occur while querying a data set
#[derive(Debug, Error)]
pub enum QueryDataSetError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Executor(#[from] ExecutorError),
}

/// Validate a POST request and execute it
pub async fn handle(
    executor: &dyn DataSetQueryExecutor,
    data_set_id: Uuid,
    request: DataSetQueryRequest,
) -> Result<DataSetQueryResponse, QueryDataSetError> {
    let request = request.validated()?;
    Ok(executor.execute(data_set_id, request).await?)
}

/// Parse and validate a GET query string into the equivalent POST request
///
/// The GET shape is validated with its own limits, so the converted request
/// goes to [`handle_get`] rather than back through [`handle`].
pub fn parse_get(query: &str) -> Result<DataSetQueryRequest, QueryError> {
    DataSetGetQueryRequest::from_query_string(query)?.to_query_request()
}

/// Execute a request produced by [`parse_get`]
pub async fn handle_get(
    executor: &dyn DataSetQueryExecutor,
    data_set_id: Uuid,
    request: DataSetQueryRequest,
) -> Result<DataSetQueryResponse, QueryDataSetError> {
    Ok(executor.execute(data_set_id, request).await?)
}
