//! Server integration tests
//!
//! Exercise the router end to end with an in-memory tower service and a
//! temp-directory history store.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use billscan_core::ai::sample_raw_response;
use billscan_core::{coerce_bill_data, AiSettings, BillData, HistoryStore};

use crate::{app, AppState};

fn test_state(dir: &std::path::Path) -> Arc<AppState> {
    Arc::new(AppState {
        history: HistoryStore::open(dir.join("data")).unwrap(),
        settings: AiSettings::default(),
        csv_dir: dir.join("csv"),
    })
}

fn sample_bill() -> BillData {
    coerce_bill_data(&sample_raw_response()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn test_history_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(test_state(dir.path()));

    let response = app
        .oneshot(Request::get("/api/history").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn test_append_and_list_history() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(dir.path());

    let body = json!({ "data": sample_bill() });
    let response = app(state.clone())
        .oneshot(json_request("POST", "/api/history", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let record = body_json(response).await;
    assert_eq!(record["data"]["accountNumber"], "1234-5678-90");
    assert!(record["id"].is_string());

    let response = app(state)
        .oneshot(Request::get("/api/history").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let records = body_json(response).await;
    assert_eq!(records.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_clear_history() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(dir.path());
    state.history.append(&sample_bill(), None).unwrap();

    let response = app(state.clone())
        .oneshot(
            Request::delete("/api/history")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(state.history.list().unwrap().is_empty());
}

#[tokio::test]
async fn test_save_analysis_writes_csv() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(dir.path());

    let body = serde_json::to_value(sample_bill()).unwrap();
    let response = app(state.clone())
        .oneshot(json_request("POST", "/api/save-analysis", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let message = body_json(response).await;
    assert!(message["message"]
        .as_str()
        .unwrap()
        .contains("bill-data.csv"));

    let files: Vec<_> = std::fs::read_dir(&state.csv_dir).unwrap().collect();
    assert_eq!(files.len(), 1);
}

#[tokio::test]
async fn test_analyze_without_credentials_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(test_state(dir.path()));

    // default settings select Gemini with no API key
    let body = json!({ "imageData": "data:image/png;base64,AAAA" });
    let response = app
        .oneshot(json_request("POST", "/api/analyze", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = body_json(response).await;
    assert!(error["error"].as_str().unwrap().contains("Gemini"));
}
