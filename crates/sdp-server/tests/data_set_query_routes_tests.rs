//! Route tests for the data set query API
//!
//! These tests drive the full router (middleware included) with `oneshot`
//! and a recording executor, checking status codes, response envelopes and
//! what reaches the executor.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use sdp_common::query::DataSetQueryRequest;
use sdp_server::{
    api::create_router,
    config::Config,
    features::data_sets::{
        DataSetQueryExecutor, DataSetQueryResponse, ExecutorError, PagingViewModel,
    },
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

const DATA_SET_ID: &str = "6b3a2c8e-0d4f-4b1a-9c7e-5f2d1e0a9b84";

// ============================================================================
// Helper Functions
// ============================================================================

#[derive(Clone, Copy)]
enum Outcome {
    Results,
    NotFound,
    Internal,
}

/// Executor that records every request it receives
struct RecordingExecutor {
    outcome: Outcome,
    calls: Mutex<Vec<(Uuid, DataSetQueryRequest)>>,
}

impl RecordingExecutor {
    fn new(outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<(Uuid, DataSetQueryRequest)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DataSetQueryExecutor for RecordingExecutor {
    async fn execute(
        &self,
        data_set_id: Uuid,
        request: DataSetQueryRequest,
    ) -> Result<DataSetQueryResponse, ExecutorError> {
        let (page, page_size) = (request.page, request.page_size);
        self.calls.lock().unwrap().push((data_set_id, request));

        match self.outcome {
            Outcome::Results => Ok(DataSetQueryResponse {
                paging: PagingViewModel::new(page, page_size, 1),
                results: vec![json!({ "values": { "ind1": "42" } })],
            }),
            Outcome::NotFound => Err(ExecutorError::NotFound(data_set_id)),
            Outcome::Internal => Err(ExecutorError::Internal("storage offline".to_string())),
        }
    }
}

fn create_test_app(executor: Arc<RecordingExecutor>) -> Router {
    create_router(executor, &Config::default())
}

fn query_uri(suffix: &str) -> String {
    format!("/api/v1/data-sets/{}/query{}", DATA_SET_ID, suffix)
}

async fn read_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Helper to send a GET request
async fn get_request(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    (status, read_body(response).await)
}

/// Helper to send a POST request with a raw body
async fn post_raw(app: &Router, uri: &str, body: String) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .method("POST")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    (status, read_body(response).await)
}

/// Helper to send a POST request
async fn post_request(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    post_raw(app, uri, body.to_string()).await
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app(RecordingExecutor::new(Outcome::Results));
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");
}

// ============================================================================
// POST query
// ============================================================================

#[tokio::test]
async fn test_valid_post_query_reaches_executor() {
    let executor = RecordingExecutor::new(Outcome::Results);
    let app = create_test_app(executor.clone());

    let (status, body) = post_request(
        &app,
        &query_uri(""),
        json!({
            "criteria": { "geographicLevels": { "eq": "NAT" } },
            "indicators": ["ind1"],
            "pageSize": 10
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["paging"]["pageSize"], 10);
    assert_eq!(body["data"]["results"][0]["values"]["ind1"], "42");
    assert!(body.get("meta").is_none());

    let calls = executor.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, Uuid::parse_str(DATA_SET_ID).unwrap());
    assert_eq!(calls[0].1.page, 1);
    assert_eq!(calls[0].1.indicators, Some(vec!["ind1".to_string()]));
}

#[tokio::test]
async fn test_invalid_post_query_returns_findings() {
    let executor = RecordingExecutor::new(Outcome::Results);
    let app = create_test_app(executor.clone());

    let (status, body) = post_request(
        &app,
        &query_uri(""),
        json!({
            "criteria": { "filters": { "eq": "" } },
            "page": 0,
            "pageSize": 10001
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let errors = body["error"]["details"]["errors"].as_array().unwrap();
    let paths: Vec<_> = errors.iter().map(|e| e["path"].as_str().unwrap()).collect();
    assert_eq!(paths, vec!["Criteria.Filters.Eq", "Page", "PageSize"]);
    assert_eq!(errors[0]["code"], "NotEmpty");
    assert_eq!(errors[1]["code"], "OutOfBounds");

    assert!(executor.calls().is_empty());
}

#[tokio::test]
async fn test_malformed_post_body_is_rejected() {
    let executor = RecordingExecutor::new(Outcome::Results);
    let app = create_test_app(executor.clone());

    let (status, body) =
        post_request(&app, &query_uri(""), json!({ "criteria": { "between": [] } })).await;
    assert!(status.is_client_error());
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let (status, _) = post_raw(&app, &query_uri(""), "{not json".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(executor.calls().is_empty());
}

#[tokio::test]
async fn test_invalid_data_set_id_is_rejected() {
    let executor = RecordingExecutor::new(Outcome::Results);
    let app = create_test_app(executor.clone());

    let (status, body) =
        post_request(&app, "/api/v1/data-sets/not-a-uuid/query", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].as_str().unwrap().contains("not-a-uuid"));
    assert!(executor.calls().is_empty());
}

#[tokio::test]
async fn test_debug_query_echoes_request() {
    let app = create_test_app(RecordingExecutor::new(Outcome::Results));

    let (status, body) = post_request(&app, &query_uri(""), json!({ "debug": true })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["request"]["debug"], true);
    assert_eq!(body["meta"]["request"]["pageSize"], 1000);
}

#[tokio::test]
async fn test_executor_errors_map_to_status_codes() {
    let app = create_test_app(RecordingExecutor::new(Outcome::NotFound));
    let (status, body) = post_request(&app, &query_uri(""), json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let app = create_test_app(RecordingExecutor::new(Outcome::Internal));
    let (status, body) = post_request(&app, &query_uri(""), json!({})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
    assert!(!body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("storage offline"));
}

#[tokio::test]
async fn test_unconfigured_executor_is_unavailable() {
    let app = create_router(
        Arc::new(sdp_server::features::data_sets::UnconfiguredExecutor),
        &Config::default(),
    );
    let (status, body) = post_request(&app, &query_uri(""), json!({})).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
}

// ============================================================================
// GET query
// ============================================================================

#[tokio::test]
async fn test_get_query_is_converted_before_execution() {
    let executor = RecordingExecutor::new(Outcome::Results);
    let app = create_test_app(executor.clone());

    let (status, _) = get_request(
        &app,
        &query_uri(
            "?locations.in=NAT%7Ccode%7CE92000001,LA%7ColdCode%7C373&timePeriods.gte=2020%7CAY\
             &sorts=timePeriod%7CDesc&page=2",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let calls = executor.calls();
    assert_eq!(calls.len(), 1);
    let expected: DataSetQueryRequest = serde_json::from_value(json!({
        "criteria": {
            "locations": { "in": [
                { "level": "NAT", "code": "E92000001" },
                { "level": "LA", "oldCode": "373" }
            ] },
            "timePeriods": { "gte": { "period": "2020", "code": "AY" } }
        },
        "sorts": [{ "field": "timePeriod", "direction": "Desc" }],
        "page": 2
    }))
    .unwrap();
    assert_eq!(calls[0].1, expected);
}

#[tokio::test]
async fn test_get_query_without_parameters_uses_defaults() {
    let executor = RecordingExecutor::new(Outcome::Results);
    let app = create_test_app(executor.clone());

    let (status, _) = get_request(&app, &query_uri("")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(executor.calls()[0].1, DataSetQueryRequest::default());
}

#[tokio::test]
async fn test_debug_get_query_echoes_converted_request() {
    let app = create_test_app(RecordingExecutor::new(Outcome::Results));

    let (status, body) =
        get_request(&app, &query_uri("?debug=true&pageSize=5&geographicLevels.eq=NAT")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["request"]["debug"], true);
    assert_eq!(body["meta"]["request"]["pageSize"], 5);
    assert_eq!(
        body["meta"]["request"]["criteria"]["geographicLevels"]["eq"],
        "NAT"
    );

    let (_, body) = get_request(&app, &query_uri("?pageSize=5")).await;
    assert!(body.get("meta").is_none());
}

#[tokio::test]
async fn test_invalid_get_query_returns_findings() {
    let executor = RecordingExecutor::new(Outcome::Results);
    let app = create_test_app(executor.clone());

    let (status, body) =
        get_request(&app, &query_uri("?locations.eq=SCH%7Ccode%7C123&geographicLevels.eq=XX")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    let errors = body["error"]["details"]["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    assert!(executor.calls().is_empty());
}

#[tokio::test]
async fn test_unknown_get_parameter_is_rejected() {
    let executor = RecordingExecutor::new(Outcome::Results);
    let app = create_test_app(executor.clone());

    let (status, body) = get_request(&app, &query_uri("?filters.between=a")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_PARAMETER");
    assert!(executor.calls().is_empty());
}

// ============================================================================
// Validate only
// ============================================================================

#[tokio::test]
async fn test_validate_returns_normalized_request() {
    let executor = RecordingExecutor::new(Outcome::Results);
    let app = create_test_app(executor.clone());

    let (status, body) = post_request(
        &app,
        &query_uri("/validate"),
        json!({ "criteria": { "not": { "filters": { "notIn": ["a"] } } } }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["page"], 1);
    assert_eq!(body["data"]["pageSize"], 1000);
    assert_eq!(body["data"]["criteria"]["not"]["filters"]["notIn"][0], "a");
    assert!(executor.calls().is_empty());
}

#[tokio::test]
async fn test_validate_reports_findings() {
    let app = create_test_app(RecordingExecutor::new(Outcome::Results));

    let (status, body) = post_request(
        &app,
        &query_uri("/validate"),
        json!({ "criteria": { "or": [] }, "sorts": [] }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["error"]["details"]["errors"].as_array().unwrap();
    let paths: Vec<_> = errors.iter().map(|e| e["path"].as_str().unwrap()).collect();
    assert_eq!(paths, vec!["Criteria.Or", "Sorts"]);
}
