//! Integration tests for farescout-bg HTTP endpoints
//!
//! Tests cover:
//! - Health endpoint
//! - Producer reports (RAW_PAYLOAD, FLIGHTS_DETECTED) scoped to the sender session
//! - Consumer queries (GET_FLIGHTS, GET_RAW_PAYLOADS, STORE_FLIGHTS, CLEAR_FLIGHTS)
//!   scoped to the active session
//! - Navigation clears, badge events, auth pass-through
//! - Per-session SSE event stream
//! - Unknown message kinds answered with 204

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use farescout_bg::credentials::MemoryCredentialStore;
use farescout_bg::{build_router, AppState};
use farescout_common::events::{EventBus, ScoutEvent};
use futures::StreamExt;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt; // for `oneshot` method

/// Test helper: app plus the event bus it publishes on
fn setup_app() -> (Router, EventBus) {
    let events = EventBus::new(64);
    let state = AppState::new(events.clone(), Arc::new(MemoryCredentialStore::default()));
    (build_router(state), events)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Option<Value>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    if status == StatusCode::NO_CONTENT {
        return (status, None);
    }
    (status, Some(extract_json(response.into_body()).await))
}

async fn activate(app: &Router, session: &str) {
    let (status, _) = send(
        app,
        json_request("PUT", "/api/active-session", json!({ "sessionId": session })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

async fn consumer(app: &Router, message: Value) -> (StatusCode, Option<Value>) {
    send(app, json_request("POST", "/api/messages", message)).await
}

async fn producer(app: &Router, session: &str, message: Value) -> (StatusCode, Option<Value>) {
    send(
        app,
        json_request("POST", &format!("/api/sessions/{}/messages", session), message),
    )
    .await
}

fn ua1() -> Value {
    json!({ "code": "UA1", "originAirport": "JFK", "destAirport": "LHR", "departureTime": "10:00", "price": 512.0 })
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = setup_app();

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "farescout-bg");
    assert!(body["version"].is_string());
}

// =============================================================================
// Producer -> core
// =============================================================================

#[tokio::test]
async fn test_flights_detected_dedups_and_reports_to_consumer() {
    let (app, _) = setup_app();
    activate(&app, "tab-1").await;

    let (status, body) = producer(
        &app,
        "tab-1",
        json!({ "type": "FLIGHTS_DETECTED", "records": [ua1(), ua1()] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap(), json!({ "success": true }));

    producer(&app, "tab-1", json!({ "type": "FLIGHTS_DETECTED", "flights": [ua1()] })).await;

    let (_, body) = consumer(&app, json!({ "type": "GET_FLIGHTS" })).await;
    let records = body.unwrap()["records"].as_array().unwrap().clone();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["code"], "UA1");
    assert_eq!(records[0]["price"], 512.0);
}

#[tokio::test]
async fn test_producer_reports_stay_in_sender_session() {
    let (app, _) = setup_app();
    activate(&app, "tab-2").await;

    producer(&app, "tab-1", json!({ "type": "FLIGHTS_DETECTED", "records": [ua1()] })).await;

    let (_, body) = consumer(&app, json!({ "type": "GET_FLIGHTS" })).await;
    assert_eq!(body.unwrap(), json!({ "records": [] }));

    let request = Request::builder()
        .uri("/api/sessions/tab-1")
        .body(Body::empty())
        .unwrap();
    let (_, snapshot) = send(&app, request).await;
    let snapshot = snapshot.unwrap();
    assert_eq!(snapshot["sessionId"], "tab-1");
    assert_eq!(snapshot["badgeCount"], 1);
}

#[tokio::test]
async fn test_oddly_typed_auxiliary_fields_do_not_reject_batch() {
    let (app, _) = setup_app();
    activate(&app, "tab-1").await;

    let ba117 = json!({
        "code": "BA117", "originAirport": "JFK", "destAirport": "LHR", "departureTime": "18:30",
        "price": "$512", "stops": "nonstop"
    });
    let (status, _) = producer(
        &app,
        "tab-1",
        json!({ "type": "FLIGHTS_DETECTED", "records": [ua1(), ba117.clone()] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Same identity with numeric auxiliaries is still a duplicate
    let mut ba117_numeric = ba117.clone();
    ba117_numeric["price"] = json!(512);
    ba117_numeric["stops"] = json!(0);
    producer(&app, "tab-1", json!({ "type": "FLIGHTS_DETECTED", "records": [ba117_numeric] })).await;

    let (_, body) = consumer(&app, json!({ "type": "GET_FLIGHTS" })).await;
    let records = body.unwrap()["records"].as_array().unwrap().clone();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1]["price"], "$512");
    assert_eq!(records[1]["stops"], "nonstop");
}

// =============================================================================
// Consumer -> core
// =============================================================================

#[tokio::test]
async fn test_get_raw_payloads_serves_cache() {
    let (app, _) = setup_app();
    activate(&app, "tab-1").await;

    producer(
        &app,
        "tab-1",
        json!({ "type": "RAW_PAYLOAD", "url": "https://example.test/offers", "payload": "{}" }),
    )
    .await;

    let (status, body) = consumer(&app, json!({ "type": "GET_RAW_PAYLOADS" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body.unwrap(),
        json!({ "payloads": [{ "url": "https://example.test/offers", "payload": "{}" }] })
    );
}

#[tokio::test(start_paused = true)]
async fn test_get_raw_payloads_waits_for_dump() {
    let (app, events) = setup_app();
    let mut rx = events.subscribe();
    activate(&app, "tab-1").await;

    let pending = {
        let app = app.clone();
        tokio::spawn(async move { consumer(&app, json!({ "type": "GET_RAW_PAYLOADS" })).await })
    };

    // Producer sees the dump request and answers inside the window
    let event = rx.recv().await.unwrap();
    assert_eq!(event.event_name(), "REQUEST_PAYLOADS_DUMP");
    assert_eq!(event.session_id().as_str(), "tab-1");

    tokio::time::sleep(Duration::from_millis(50)).await;
    producer(
        &app,
        "tab-1",
        json!({ "type": "RAW_PAYLOAD", "url": "https://example.test/a", "payload": "a" }),
    )
    .await;

    let (status, body) = pending.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["payloads"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_no_active_session_answers_empty_defaults() {
    let (app, _) = setup_app();

    let (_, body) = consumer(&app, json!({ "type": "GET_FLIGHTS" })).await;
    assert_eq!(body.unwrap(), json!({ "records": [] }));

    let (_, body) = consumer(&app, json!({ "type": "GET_RAW_PAYLOADS" })).await;
    assert_eq!(body.unwrap(), json!({ "payloads": [] }));
}

#[tokio::test]
async fn test_store_and_clear_flights() {
    let (app, events) = setup_app();
    let mut rx = events.subscribe();
    activate(&app, "tab-1").await;

    consumer(&app, json!({ "type": "STORE_FLIGHTS", "records": [ua1()] })).await;
    match rx.recv().await.unwrap() {
        ScoutEvent::BadgeUpdated { session_id, text, .. } => {
            assert_eq!(session_id.as_str(), "tab-1");
            assert_eq!(text, "1");
        }
        other => panic!("unexpected event: {:?}", other),
    }

    let (status, _) = consumer(&app, json!({ "type": "CLEAR_FLIGHTS" })).await;
    assert_eq!(status, StatusCode::OK);
    match rx.recv().await.unwrap() {
        ScoutEvent::BadgeUpdated { text, .. } => assert_eq!(text, ""),
        other => panic!("unexpected event: {:?}", other),
    }

    let (_, body) = consumer(&app, json!({ "type": "GET_FLIGHTS" })).await;
    assert_eq!(body.unwrap(), json!({ "records": [] }));
}

#[tokio::test]
async fn test_unknown_kind_is_no_content() {
    let (app, _) = setup_app();
    let (status, body) = consumer(&app, json!({ "type": "OPEN_CHECKOUT" })).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_none());
}

#[tokio::test]
async fn test_empty_active_session_rejected() {
    let (app, _) = setup_app();
    let (status, body) = send(
        &app,
        json_request("PUT", "/api/active-session", json!({ "sessionId": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.unwrap()["error"].as_str().unwrap().contains("sessionId"));
}

// =============================================================================
// Outbound events (SSE)
// =============================================================================

#[tokio::test]
async fn test_session_events_carry_only_that_session() {
    let (app, _) = setup_app();
    activate(&app, "tab-1").await;

    let request = Request::builder()
        .uri("/api/sessions/tab-1/events")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "text/event-stream");
    let mut events = response.into_body().into_data_stream();

    // Badge update for another session must not reach this stream
    producer(&app, "tab-2", json!({ "type": "FLIGHTS_DETECTED", "records": [ua1()] })).await;

    // Cache miss on the active session asks its producer for a dump
    let pending = {
        let app = app.clone();
        tokio::spawn(async move { consumer(&app, json!({ "type": "GET_RAW_PAYLOADS" })).await })
    };

    let frame = tokio::time::timeout(Duration::from_secs(5), events.next())
        .await
        .expect("Should receive an SSE frame")
        .expect("Stream should stay open")
        .expect("Should read frame");
    let text = String::from_utf8(frame.to_vec()).unwrap();
    assert!(text.contains("event: REQUEST_PAYLOADS_DUMP"), "frame: {}", text);
    assert!(text.contains(r#""sessionId":"tab-1""#), "frame: {}", text);
    assert!(text.contains(r#""requestId":"#), "frame: {}", text);
    assert!(!text.contains("tab-2"));
    assert!(!text.contains("BadgeUpdated"));

    let (status, body) = pending.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap(), json!({ "payloads": [] }));

    // Nothing else was queued for tab-1
    assert!(
        tokio::time::timeout(Duration::from_millis(100), events.next())
            .await
            .is_err()
    );
}

// =============================================================================
// Host runtime -> core
// =============================================================================

#[tokio::test]
async fn test_navigation_clears_session() {
    let (app, _) = setup_app();
    activate(&app, "tab-1").await;
    producer(&app, "tab-1", json!({ "type": "FLIGHTS_DETECTED", "records": [ua1()] })).await;

    // Subframe navigation keeps the cache
    send(
        &app,
        json_request("POST", "/api/sessions/tab-1/navigation", json!({ "frameId": 3 })),
    )
    .await;
    let (_, body) = consumer(&app, json!({ "type": "GET_FLIGHTS" })).await;
    assert_eq!(body.unwrap()["records"].as_array().unwrap().len(), 1);

    // Body-less request is a top-level navigation
    let request = Request::builder()
        .method("POST")
        .uri("/api/sessions/tab-1/navigation")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = consumer(&app, json!({ "type": "GET_FLIGHTS" })).await;
    assert_eq!(body.unwrap(), json!({ "records": [] }));
}

#[tokio::test]
async fn test_deactivated_session_answers_empty() {
    let (app, _) = setup_app();
    activate(&app, "tab-1").await;
    producer(&app, "tab-1", json!({ "type": "FLIGHTS_DETECTED", "records": [ua1()] })).await;

    send(
        &app,
        json_request("PUT", "/api/active-session", json!({ "sessionId": null })),
    )
    .await;

    let (_, body) = consumer(&app, json!({ "type": "GET_FLIGHTS" })).await;
    assert_eq!(body.unwrap(), json!({ "records": [] }));
}

// =============================================================================
// Auth pass-through
// =============================================================================

#[tokio::test]
async fn test_auth_round_trip() {
    let (app, _) = setup_app();

    let (status, body) = consumer(
        &app,
        json!({ "type": "SET_AUTH", "accessToken": "a", "refreshToken": "r", "userEmail": "pat@example.test" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap(), json!({ "success": true }));

    let (_, body) = consumer(&app, json!({ "type": "GET_AUTH" })).await;
    assert_eq!(
        body.unwrap(),
        json!({ "accessToken": "a", "refreshToken": "r", "userEmail": "pat@example.test" })
    );

    consumer(&app, json!({ "type": "CLEAR_AUTH" })).await;
    let (_, body) = consumer(&app, json!({ "type": "GET_AUTH" })).await;
    assert_eq!(
        body.unwrap(),
        json!({ "accessToken": null, "refreshToken": null, "userEmail": null })
    );
}
