use std::net::SocketAddr;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use centering_view::{GatewayError, RelationSource, ResponseShape};

use super::*;

const STUDY: &str = include_str!("../../fixtures/study.json");

async fn center(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    match body.get("text").and_then(Value::as_str) {
        Some(text) if !text.trim().is_empty() => {
            let results: Vec<Value> = text
                .split('.')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| json!({ "Cb": null, "Cf": [], "sentence": format!("{}.", s) }))
                .collect();
            (StatusCode::OK, Json(json!({ "results": results })))
        }
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "No text provided" })),
        ),
    }
}

async fn study() -> (StatusCode, String) {
    (StatusCode::OK, STUDY.to_string())
}

async fn empty() -> Json<Value> {
    Json(json!({ "results": [] }))
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(500)).await;
    Json(json!({ "results": [] }))
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "upstream model crashed")
}

async fn serve() -> SocketAddr {
    let app = Router::new()
        .route("/center", post(center))
        .route("/study", post(study))
        .route("/empty", post(empty))
        .route("/slow", post(slow))
        .route("/broken", post(broken));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn gateway(addr: SocketAddr, path: &str, timeout_ms: u64) -> HttpGateway {
    HttpGateway::new(GatewaySettings {
        endpoint: format!("http://{}{}", addr, path),
        timeout: Duration::from_millis(timeout_ms),
    })
    .unwrap()
}

#[tokio::test]
async fn posts_text_and_parses_legacy_shape() {
    let addr = serve().await;
    let payload = gateway(addr, "/center", 5_000)
        .analyze("Jill caught a ball. She tossed it to John.")
        .await
        .unwrap();

    assert_eq!(payload.shape, ResponseShape::Legacy);
    assert_eq!(payload.relations, RelationSource::Derived);
    assert_eq!(payload.results[1].sentence, "She tossed it to John.");
}

#[tokio::test]
async fn parses_canonical_shape() {
    let addr = serve().await;
    let payload = gateway(addr, "/study", 5_000).analyze("ignored").await.unwrap();

    assert_eq!(payload.shape, ResponseShape::Canonical);
    assert_eq!(payload.results.len(), 4);
    assert!(matches!(payload.relations, RelationSource::Supplied(ref r) if r.len() == 4));
}

#[tokio::test]
async fn error_envelope_becomes_network_error() {
    let addr = serve().await;
    let err = gateway(addr, "/center", 5_000).analyze("   ").await.unwrap_err();

    match err {
        GatewayError::Network { status, detail } => {
            assert_eq!(status, Some(400));
            assert!(detail.ends_with("No text provided"), "{}", detail);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn non_json_failure_body_is_kept() {
    let addr = serve().await;
    let err = gateway(addr, "/broken", 5_000).analyze("Hi.").await.unwrap_err();

    match err {
        GatewayError::Network { status, detail } => {
            assert_eq!(status, Some(500));
            assert!(detail.contains("upstream model crashed"), "{}", detail);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn empty_result_list_is_reported() {
    let addr = serve().await;
    let err = gateway(addr, "/empty", 5_000).analyze("Hi.").await.unwrap_err();
    assert_eq!(err, GatewayError::EmptyResult);
}

#[tokio::test]
async fn slow_backend_times_out() {
    let addr = serve().await;
    let err = gateway(addr, "/slow", 50).analyze("Hi.").await.unwrap_err();

    match err {
        GatewayError::Network { status: None, detail } => {
            assert!(detail.contains("timed out"), "{}", detail)
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = gateway(addr, "/center", 1_000).analyze("Hi.").await.unwrap_err();
    assert!(matches!(err, GatewayError::Network { status: None, .. }));
}
