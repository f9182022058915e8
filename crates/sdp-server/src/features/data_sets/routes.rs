use crate::api::response::{ApiResponse, ErrorResponse};
use axum::{
    extract::{rejection::JsonRejection, Path, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use sdp_common::query::{DataSetQueryRequest, QueryError};
use serde_json::json;
use uuid::Uuid;

use super::executor::{DataSetQueryResponse, ExecutorError, SharedExecutor};
use super::queries::{query_data_set, validate_query, QueryDataSetError};

pub fn data_sets_routes() -> Router<SharedExecutor> {
    Router::new()
        .route(
            "/:data_set_id/query",
            get(query_data_set_get_handler).post(query_data_set_handler),
        )
        .route("/:data_set_id/query/validate", post(validate_query_handler))
}

#[tracing::instrument(skip(executor, payload))]
async fn query_data_set_handler(
    State(executor): State<SharedExecutor>,
    Path(data_set_id): Path<String>,
    payload: Result<Json<DataSetQueryRequest>, JsonRejection>,
) -> Result<Response, DataSetQueryError> {
    let data_set_id = parse_data_set_id(&data_set_id)?;
    let Json(request) = payload?;
    let echo = request.debug.then(|| request.clone());

    let response = query_data_set::handle(executor.as_ref(), data_set_id, request).await?;

    Ok(query_response(response, echo))
}

#[tracing::instrument(skip(executor, query))]
async fn query_data_set_get_handler(
    State(executor): State<SharedExecutor>,
    Path(data_set_id): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Response, DataSetQueryError> {
    let data_set_id = parse_data_set_id(&data_set_id)?;
    let request = query_data_set::parse_get(query.as_deref().unwrap_or(""))?;
    let echo = request.debug.then(|| request.clone());

    let response = query_data_set::handle_get(executor.as_ref(), data_set_id, request).await?;

    Ok(query_response(response, echo))
}

#[tracing::instrument(skip(payload))]
async fn validate_query_handler(
    Path(data_set_id): Path<String>,
    payload: Result<Json<DataSetQueryRequest>, JsonRejection>,
) -> Result<Response, DataSetQueryError> {
    parse_data_set_id(&data_set_id)?;
    let Json(request) = payload?;
    let request = validate_query::handle(request)?;

    Ok((StatusCode::OK, Json(ApiResponse::success(request))).into_response())
}

fn parse_data_set_id(value: &str) -> Result<Uuid, DataSetQueryError> {
    Uuid::parse_str(value).map_err(|_| DataSetQueryError::InvalidDataSetId(value.to_string()))
}

fn query_response(response: DataSetQueryResponse, echo: Option<DataSetQueryRequest>) -> Response {
    tracing::info!(
        results = response.results.len(),
        total_results = response.paging.total_results,
        "Query executed successfully"
    );

    let body = match echo {
        Some(request) => ApiResponse::success_with_meta(response, json!({ "request": request })),
        None => ApiResponse::success(response),
    };
    (StatusCode::OK, Json(body)).into_response()
}

#[derive(Debug)]
enum DataSetQueryError {
    InvalidDataSetId(String),
    MalformedBody { status: StatusCode, message: String },
    Query(QueryError),
    Executor(ExecutorError),
}

impl From<JsonRejection> for DataSetQueryError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryError> for DataSetQueryError {
    fn from(err: QueryError) -> Self {
        Self::Query(err)
    }
}

impl From<QueryDataSetError> for DataSetQueryError {
    fn from(err: QueryDataSetError) -> Self {
        match err {
            QueryDataSetError::Query(err) => Self::Query(err),
            QueryDataSetError::Executor(err) => Self::Executor(err),
        }
    }
}

impl IntoResponse for DataSetQueryError {
    fn into_response(self) -> Response {
        match self {
            DataSetQueryError::InvalidDataSetId(id) => ErrorResponse::new(
                "BAD_REQUEST",
                format!("'{}' is not a valid data set ID", id),
            )
            .into_response_with(StatusCode::BAD_REQUEST),
            DataSetQueryError::MalformedBody { status, message } => {
                ErrorResponse::new("BAD_REQUEST", message).into_response_with(status)
            },
            DataSetQueryError::Query(QueryError::Invalid(findings)) => {
                tracing::debug!(count = findings.len(), "Rejecting invalid query request");
                ErrorResponse::with_details(
                    "VALIDATION_ERROR",
                    "One or more validation errors occurred",
                    json!({ "errors": findings }),
                )
                .into_response_with(StatusCode::BAD_REQUEST)
            },
            DataSetQueryError::Query(err @ QueryError::InvalidParameter { .. }) => {
                ErrorResponse::new("INVALID_PARAMETER", err.to_string())
                    .into_response_with(StatusCode::BAD_REQUEST)
            },
            DataSetQueryError::Query(err) => ErrorResponse::new("VALIDATION_ERROR", err.to_string())
                .into_response_with(StatusCode::BAD_REQUEST),
            DataSetQueryError::Executor(err @ ExecutorError::NotFound(_)) => {
                ErrorResponse::new("NOT_FOUND", err.to_string())
                    .into_response_with(StatusCode::NOT_FOUND)
            },
            DataSetQueryError::Executor(err @ ExecutorError::Unavailable(_)) => {
                tracing::warn!("{}", err);
                ErrorResponse::new("SERVICE_UNAVAILABLE", err.to_string())
                    .into_response_with(StatusCode::SERVICE_UNAVAILABLE)
            },
            DataSetQueryError::Executor(err @ ExecutorError::Internal(_)) => {
                tracing::error!("Query execution failed: {}", err);
                ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred")
                    .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
            },
        }
    }
}

impl std::fmt::Display for DataSetQueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDataSetId(id) => write!(f, "Invalid data set ID: {}", id),
            Self::MalformedBody { message, .. } => write!(f, "{}", message),
            Self::Query(e) => write!(f, "{}", e),
            Self::Executor(e) => write!(f, "{}", e),
        }
    }
}
