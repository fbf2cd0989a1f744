use std::collections::HashMap;
use std::time::Duration;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use cqhttp_core::{Fetcher, HttpClientConfig, Params, SessionMode, TransportError};
use cqhttp_transport::Fetch;

async fn spawn_gateway() -> String {
    let app = Router::new()
        .route(
            "/echo",
            post(|Json(body): Json<Value>| async move {
                Json(json!({ "status": "ok", "data": body }))
            }),
        )
        .route(
            "/bodyless",
            post(|body: String| async move {
                Json(json!({ "status": "ok", "data": { "empty": body.is_empty() } }))
            }),
        )
        .route("/garbage", post(|| async { "<html>not json</html>" }))
        .route(
            "/latin1",
            post(|| async { b"{\"status\":\"ok\",\"data\":{\"nickname\":\"\xff\xfe\"}}".to_vec() }),
        )
        .route(
            "/boom",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "exploded") }),
        )
        .route(
            "/missing",
            get(|| async { (StatusCode::NOT_FOUND, "no such action") }),
        )
        .route(
            "/query",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                Json(json!({ "status": "ok", "data": q }))
            }),
        )
        .route(
            "/slow",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn fetch(base: &str, session: SessionMode) -> Fetch {
    Fetch::new(&HttpClientConfig::new(base).with_session(session)).unwrap()
}

#[tokio::test]
async fn test_post_returns_decoded_json() {
    let base = spawn_gateway().await;
    for session in [SessionMode::PerCall, SessionMode::Pooled] {
        let fetch = fetch(&base, session);
        assert_eq!(fetch.session_mode(), session);

        let payload = json!({ "group_id": 123, "message": "hi" });
        let reply = fetch
            .http_post(&format!("{base}/echo"), Some(&payload))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reply["status"], "ok");
        assert_eq!(reply["data"], payload);
    }
}

#[tokio::test]
async fn test_post_without_payload_sends_no_body() {
    let base = spawn_gateway().await;
    let fetch = fetch(&base, SessionMode::PerCall);

    let reply = fetch
        .http_post(&format!("{base}/bodyless"), None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reply["data"]["empty"], true);
}

#[tokio::test]
async fn test_malformed_body_is_absent_not_error() {
    let base = spawn_gateway().await;
    let fetch = fetch(&base, SessionMode::PerCall);

    let reply = fetch
        .http_post(&format!("{base}/garbage"), Some(&json!({})))
        .await
        .unwrap();
    assert!(reply.is_none());
}

#[tokio::test]
async fn test_invalid_utf8_body_is_a_request_failure() {
    let base = spawn_gateway().await;
    let fetch = fetch(&base, SessionMode::PerCall);

    let err = fetch
        .http_post(&format!("{base}/latin1"), None)
        .await
        .unwrap_err();
    match err {
        TransportError::Request { ref reason, .. } => assert!(reason.contains("UTF-8")),
        other => panic!("expected request error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_error_status_is_fatal() {
    let base = spawn_gateway().await;
    let fetch = fetch(&base, SessionMode::Pooled);

    let err = fetch
        .http_post(&format!("{base}/boom"), None)
        .await
        .unwrap_err();
    match err {
        TransportError::Status { status, ref body, .. } => {
            assert_eq!(status, 500);
            assert_eq!(body, "exploded");
        }
        other => panic!("expected status error, got {other:?}"),
    }

    let err = fetch
        .http_get(&format!("{base}/missing"), None)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_get_encodes_query_params() {
    let base = spawn_gateway().await;
    let fetch = fetch(&base, SessionMode::PerCall);

    let mut params = Params::new();
    params.insert("group_id".into(), json!(123));
    params.insert("no_cache".into(), json!(true));
    params.insert("type".into(), json!("all"));

    let reply = fetch
        .http_get(&format!("{base}/query"), Some(&params))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        reply["data"],
        json!({ "group_id": "123", "no_cache": "true", "type": "all" })
    );
}

#[tokio::test]
async fn test_timeout_is_a_request_failure() {
    let base = spawn_gateway().await;
    let fetch = Fetch::new(
        &HttpClientConfig::new(&base).with_timeout(Duration::from_millis(200)),
    )
    .unwrap();

    let err = fetch
        .http_post(&format!("{base}/slow"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Request { .. }));
}

#[tokio::test]
async fn test_unreachable_gateway_is_a_request_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let fetch = fetch(&format!("http://{addr}"), SessionMode::PerCall);
    let err = fetch
        .http_post(&format!("http://{addr}/get_status"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Request { .. }));
    assert_eq!(err.status(), None);
}
