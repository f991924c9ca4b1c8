//! Webhook delivery tests against a local mock HTTP server.

use httpmock::prelude::*;
use serde_json::{json, Map, Value};
use tracklink::{send_webhook, Configuration, TrackingError, TrackingResult};

fn map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(m) => m,
        _ => panic!("expected a JSON object"),
    }
}

fn click_result(webhook_url: &str) -> TrackingResult {
    TrackingResult {
        is_open_tracking: false,
        is_click_tracking: true,
        tracked_url: Some("https://example.com/page".to_string()),
        webhook_url: Some(webhook_url.to_string()),
        metadata: map(json!({"campaign": "spring"})),
        request_data: Some(map(json!({"user_agent": "Firefox", "user_ip": "198.51.100.7"}))),
        timestamp: 1389177318,
    }
}

#[test]
fn test_posts_json_body_with_tracked_url() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/hook")
            .header("content-type", "application/json")
            .json_body(json!({
                "is_open_tracking": false,
                "is_click_tracking": true,
                "metadata": {"campaign": "spring"},
                "request_data": {"user_agent": "Firefox", "user_ip": "198.51.100.7"},
                "timestamp": 1389177318,
                "tracked_url": "https://example.com/page",
            }));
        then.status(200);
    });

    let result = click_result(&server.url("/hook"));
    let response = send_webhook(&result, &Configuration::default()).unwrap();

    mock.assert();
    assert_eq!(response.status(), 200);
}

#[test]
fn test_open_event_body_omits_tracked_url() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/hook").json_body(json!({
            "is_open_tracking": true,
            "is_click_tracking": false,
            "metadata": {},
            "request_data": null,
            "timestamp": 1389177318,
        }));
        then.status(200);
    });

    let result = TrackingResult {
        is_open_tracking: true,
        is_click_tracking: false,
        tracked_url: None,
        webhook_url: Some(server.url("/hook")),
        metadata: Map::new(),
        request_data: None,
        timestamp: 1389177318,
    };
    send_webhook(&result, &Configuration::default()).unwrap();

    mock.assert();
}

#[test]
fn test_non_success_status_is_returned_not_an_error() {
    // HTTP-level failures are the caller's to interpret; only transport
    // failures become errors.
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/gone");
        then.status(410);
    });

    let result = click_result(&server.url("/gone"));
    let response = send_webhook(&result, &Configuration::default()).unwrap();
    assert_eq!(response.status(), 410);
}

#[test]
fn test_connection_failure_propagates() {
    // Nothing listens on the discard port.
    let result = click_result("http://127.0.0.1:9/hook");
    let err = send_webhook(&result, &Configuration::default()).unwrap_err();
    assert!(matches!(err, TrackingError::Webhook(_)));
    assert!(!err.is_decoding_error());
}

#[test]
fn test_missing_webhook_url_is_rejected_before_any_io() {
    let mut result = click_result("unused");
    result.webhook_url = None;

    let err = send_webhook(&result, &Configuration::default()).unwrap_err();
    assert!(matches!(err, TrackingError::MissingWebhookUrl));
}
