use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};

use cqhttp_core::{FailureKind, HttpClientConfig, SessionMode};
use cqhttp_protocol::CqhttpProtocol;
use cqhttp_protocol::model::Segment;

type Received = Arc<Mutex<Vec<(String, Value)>>>;

/// Starts a fake gateway that records request bodies per endpoint.
async fn spawn_gateway() -> (String, Received) {
    let received: Received = Arc::default();

    let record = |name: &'static str, reply: Value| {
        post(
            move |State(received): State<Received>, body: Bytes| async move {
                let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
                received.lock().unwrap().push((name.to_string(), body));
                Json(reply)
            },
        )
    };

    let app = Router::new()
        .route(
            "/send_group_msg",
            record("send_group_msg", json!({ "status": "ok", "retcode": 0, "data": { "message_id": 42 } })),
        )
        .route(
            "/set_group_kick",
            record("set_group_kick", json!({ "status": "ok", "retcode": 0, "data": null })),
        )
        .route(
            "/set_group_ban",
            record("set_group_ban", json!({ "status": "async", "retcode": 1, "data": null })),
        )
        .route(
            "/get_friend_list",
            record(
                "get_friend_list",
                json!({
                    "status": "ok",
                    "retcode": 0,
                    "data": [
                        { "user_id": 1, "nickname": "first", "remark": "" },
                        { "user_id": 2, "nickname": "second", "remark": "" }
                    ]
                }),
            ),
        )
        .route("/get_status", post(|| async { "definitely not json" }))
        .route(
            "/get_login_info",
            post(|| async { (StatusCode::UNAUTHORIZED, "token required") }),
        )
        .with_state(received.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), received)
}

fn client(base: &str) -> CqhttpProtocol {
    CqhttpProtocol::new(&HttpClientConfig::new(base)).unwrap()
}

#[tokio::test]
async fn test_send_group_message_round_trip() {
    let (base, received) = spawn_gateway().await;
    let client = client(&base);

    let chain = vec![Segment::at(456), Segment::text(" hi")];
    let receipt = client.send_group_message(123, chain, None).await.unwrap();
    assert_eq!(receipt.message_id, 42);

    let received = received.lock().unwrap();
    assert_eq!(
        received[0],
        (
            "send_group_msg".to_string(),
            json!({ "group_id": 123, "message": "[CQ:at,qq=456] hi", "auto_escape": false })
        )
    );
}

#[tokio::test]
async fn test_kick_succeeds_and_async_mute_is_rejected() {
    let (base, _) = spawn_gateway().await;
    let client = client(&base);

    client.kick(123, 456, Some(true)).await.unwrap();

    let err = client.unmute(123, 456).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Rejected);
    assert!(err.to_string().contains("async"));
}

#[tokio::test]
async fn test_friend_list_over_pooled_session() {
    let (base, received) = spawn_gateway().await;
    let config = HttpClientConfig::new(&base).with_session(SessionMode::Pooled);
    let client = CqhttpProtocol::new(&config).unwrap();

    for _ in 0..2 {
        let friends = client.get_friend_list().await.unwrap();
        let ids: Vec<i64> = friends.iter().map(|f| f.user_id).collect();
        assert_eq!(ids, [1, 2]);
    }
    // Parameterless actions send no body.
    assert_eq!(received.lock().unwrap()[0].1, Value::Null);
}

#[tokio::test]
async fn test_undecodable_reply() {
    let (base, _) = spawn_gateway().await;
    let err = client(&base).get_status().await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Decode);
}

#[tokio::test]
async fn test_error_status_is_transport_failure() {
    let (base, _) = spawn_gateway().await;
    let err = client(&base).get_login_info().await.unwrap_err();
    assert!(err.is_transport());
    assert!(err.to_string().contains("401"));
}
