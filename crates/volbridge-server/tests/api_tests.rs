//! Integration tests for the volbridge HTTP API.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt; // for `oneshot`
use volbridge_mixer::mock::MockPactl;
use volbridge_mixer::{DEFAULT_TIMEOUT, Mixer};
use volbridge_server::create_app;

/// Helper to create a test app backed by a mock sink.
fn create_test_app(mock: &MockPactl) -> Router {
    let mixer = Mixer::new(Arc::new(mock.clone()), "@DEFAULT_SINK@", DEFAULT_TIMEOUT);
    create_app(mixer)
}

async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    assert_eq!(response.headers()["content-type"], "application/json");

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_get_volume_and_mute() {
    let mock = MockPactl::new().with_volume_output("Volume: aux0: 32768 / 50% / -18.06 dB");

    let (status, body) = send(create_test_app(&mock), "GET", "/api/volume").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"volume": 50, "mute": false}));
}

#[tokio::test]
async fn test_get_mute() {
    let mock = MockPactl::new().with_mute(true);

    let (status, body) = send(create_test_app(&mock), "GET", "/api/mute").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"mute": true}));
}

#[tokio::test]
async fn test_set_volume_is_clamped() {
    let mock = MockPactl::new().with_volume(20);

    let (status, body) = send(create_test_app(&mock), "POST", "/api/volume/150").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"volume": 100}));
    assert_eq!(
        mock.last_call().unwrap(),
        ["set-sink-volume", "@DEFAULT_SINK@", "100%"]
    );
    assert_eq!(mock.volume(), 100);
}

#[tokio::test]
async fn test_negative_volume_is_clamped_to_zero() {
    let mock = MockPactl::new();

    let (status, body) = send(create_test_app(&mock), "GET", "/api/volume/-30").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"volume": 0}));
    assert_eq!(mock.volume(), 0);
}

#[tokio::test]
async fn test_volume_round_trip() {
    let mock = MockPactl::new();

    for v in [0, 25, 64, 100] {
        let (_, body) = send(create_test_app(&mock), "POST", &format!("/api/volume/{v}")).await;
        assert_eq!(body["volume"], v);

        let (_, body) = send(create_test_app(&mock), "GET", "/api/volume").await;
        assert_eq!(body["volume"], v);
    }
}

#[tokio::test]
async fn test_set_mute_tokens() {
    let mock = MockPactl::new().with_volume(70);

    let (status, body) = send(create_test_app(&mock), "POST", "/api/mute/yes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"mute": true}));
    assert!(mock.is_muted());

    let (status, body) = send(create_test_app(&mock), "POST", "/api/mute/maybe").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"mute": false}));
    assert!(!mock.is_muted());

    // Muting leaves the volume alone
    let (_, body) = send(create_test_app(&mock), "GET", "/api/volume").await;
    assert_eq!(body, json!({"volume": 70, "mute": false}));
}

#[tokio::test]
async fn test_get_and_post_are_equivalent() {
    let mock = MockPactl::new();

    let (get_status, get_body) = send(create_test_app(&mock), "GET", "/api/mute/1").await;
    let (post_status, post_body) = send(create_test_app(&mock), "POST", "/api/mute/1").await;

    assert_eq!(get_status, post_status);
    assert_eq!(get_body, post_body);
}

#[tokio::test]
async fn test_repeated_reads_are_identical() {
    let mock = MockPactl::new().with_volume(33).with_mute(true);

    let (_, first) = send(create_test_app(&mock), "GET", "/api/volume").await;
    let (_, second) = send(create_test_app(&mock), "GET", "/api/volume").await;

    assert_eq!(first, second);
    // Every request goes back to pactl
    assert_eq!(mock.calls().len(), 4);
}

#[tokio::test]
async fn test_trailing_slash_and_extra_segments() {
    let mock = MockPactl::new();

    let (status, body) = send(create_test_app(&mock), "GET", "/api/mute/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"mute": false}));

    let (status, body) = send(create_test_app(&mock), "POST", "/api/volume/extra/50").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"volume": 50}));
}

#[tokio::test]
async fn test_query_string_is_ignored() {
    let mock = MockPactl::new().with_volume(45);

    let (status, body) = send(create_test_app(&mock), "GET", "/api/volume?ts=123").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"volume": 45, "mute": false}));
}

#[tokio::test]
async fn test_unknown_path() {
    let mock = MockPactl::new();

    let (status, body) = send(create_test_app(&mock), "GET", "/unknown/path").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "not found"}));
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_other_methods_are_rejected() {
    let mock = MockPactl::new();

    let (status, body) = send(create_test_app(&mock), "PUT", "/api/volume/10").await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({"error": "method not allowed"}));
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_invalid_volume_parameter() {
    let mock = MockPactl::new();

    let (status, body) = send(create_test_app(&mock), "POST", "/api/volume/loud").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("loud"));
}

#[tokio::test]
async fn test_pactl_failure() {
    let mock = MockPactl::new().failing("Connection failure: Connection refused");

    let (status, body) = send(create_test_app(&mock), "GET", "/api/volume").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("Command failed: pactl get-sink-volume @DEFAULT_SINK@"));
    assert!(message.contains("Connection refused"));
}

#[tokio::test]
async fn test_unparseable_pactl_output() {
    let mock = MockPactl::new().with_volume_output("Volume: unknown");

    let (status, body) = send(create_test_app(&mock), "GET", "/api/volume").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Could not parse volume: \"Volume: unknown\""}));
}

#[tokio::test(start_paused = true)]
async fn test_hung_pactl_times_out() {
    let mock = MockPactl::new().hanging();
    let mixer = Mixer::new(Arc::new(mock.clone()), "@DEFAULT_SINK@", Duration::from_secs(5));

    let (status, body) = send(create_app(mixer), "POST", "/api/mute/1").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("timed out after 5s"));
    // No retry
    assert_eq!(mock.calls().len(), 1);
}

#[tokio::test]
async fn test_over_loopback_socket() {
    let mock = MockPactl::new().with_volume(50);
    let app = create_test_app(&mock);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://{addr}/api/volume"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "application/json");
    let expected = r#"{"volume":50,"mute":false}"#;
    assert_eq!(response.content_length(), Some(expected.len() as u64));
    assert_eq!(response.text().await.unwrap(), expected);

    let response = client
        .post(format!("http://{addr}/nope"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    assert_eq!(response.text().await.unwrap(), r#"{"error":"not found"}"#);
}

#[tokio::test]
async fn test_hung_request_does_not_block_others() {
    let mock = MockPactl::new().hanging();
    let mixer = Mixer::new(Arc::new(mock.clone()), "@DEFAULT_SINK@", Duration::from_secs(2));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, create_app(mixer)).await.unwrap();
    });

    let client = reqwest::Client::new();
    let hung = tokio::spawn({
        let client = client.clone();
        async move { client.get(format!("http://{addr}/api/volume")).send().await }
    });

    // Wait until the first request is stuck inside pactl
    while mock.calls().is_empty() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let started = std::time::Instant::now();
    let response = client
        .get(format!("http://{addr}/nope"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    assert!(started.elapsed() < Duration::from_millis(500));
    assert!(!hung.is_finished());

    let response = hung.await.unwrap().unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.text().await.unwrap().contains("timed out after 2s"));
}
