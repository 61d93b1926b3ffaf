//! HTTP-level tests for the mock backend router.
//!
//! Requests are driven through `tower::ServiceExt::oneshot`, so no socket
//! is opened.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use nodes::AutomationCatalog;

use crate::{router, AppState, BackendConfig, MockBackend};

fn app() -> Router {
    router(AppState::new(MockBackend::new(
        AutomationCatalog::builtin(),
        BackendConfig::instant(),
    )))
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn post(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn looping_workflow() -> Value {
    json!({
        "nodes": [
            { "id": "s", "data": { "nodeType": "Start", "title": "Start" } },
            { "id": "t", "data": { "nodeType": "Task", "title": "Review", "assignee": "sam" } }
        ],
        "edges": [
            { "id": "e1", "source": "s", "target": "t" },
            { "id": "e2", "source": "t", "target": "s" }
        ]
    })
}

#[tokio::test]
async fn automations_lists_catalog() {
    let request = Request::builder().uri("/automations").body(Body::empty()).unwrap();
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(3));
    assert_eq!(body[2]["id"], "call_webhook");
    assert_eq!(body[2]["params"], json!(["url", "payload"]));
}

#[tokio::test]
async fn validate_reports_errors_in_order() {
    let (status, body) = send(post("/validate", &looping_workflow())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], false);
    assert_eq!(body["errors"][0]["type"], "start_has_incoming");
    assert_eq!(body["errors"][1]["type"], "cycle");
    assert_eq!(body["details"]["cycles"], json!([["s", "t", "s"]]));
}

#[tokio::test]
async fn simulate_returns_steps_without_validating() {
    let (status, body) = send(post("/simulate", &looping_workflow())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert!(body["runId"].is_string());
    assert_eq!(body["steps"][0]["nodeId"], "s");
    assert_eq!(
        body["steps"][1]["message"],
        "Task assigned to sam, due N/A. Custom fields: []"
    );
}

#[tokio::test]
async fn strict_simulate_rejects_invalid_graph() {
    let (status, body) = send(post("/simulate?strict=true", &looping_workflow())).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["ok"], false);
    assert_eq!(body["errors"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn empty_workflow_simulates_to_no_steps() {
    let (status, body) = send(post("/simulate", &json!({ "nodes": [], "edges": [] }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["steps"], json!([]));
}

#[tokio::test]
async fn document_without_edges_is_refused() {
    let (status, _) = send(post("/validate", &json!({ "nodes": [] }))).await;
    assert!(status.is_client_error());
}
