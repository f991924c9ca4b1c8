//! Webhook delivery of decoded tracking events.

use std::time::Duration;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::Configuration;
use crate::error::TrackingError;
use crate::types::TrackingResult;

/// The JSON body POSTed to a webhook.
///
/// `tracked_url` is omitted entirely (not sent as null) when absent; the
/// other fields are always present, null or not.
#[derive(Debug, Serialize)]
struct WebhookBody<'a> {
    is_open_tracking: bool,
    is_click_tracking: bool,
    metadata: &'a Map<String, Value>,
    request_data: &'a Option<Map<String, Value>>,
    timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    tracked_url: Option<&'a str>,
}

impl<'a> WebhookBody<'a> {
    fn from_result(result: &'a TrackingResult) -> Self {
        WebhookBody {
            is_open_tracking: result.is_open_tracking,
            is_click_tracking: result.is_click_tracking,
            metadata: &result.metadata,
            request_data: &result.request_data,
            timestamp: result.timestamp,
            tracked_url: result.tracked_url.as_deref(),
        }
    }
}

/// POST a tracking result to its webhook URL as `application/json`.
///
/// The configured timeout is a hard upper bound on how long the request may
/// block. One attempt, no retries: transport failures propagate as
/// [`TrackingError::Webhook`] for the caller to handle.
pub fn send_webhook(
    result: &TrackingResult,
    config: &Configuration,
) -> Result<reqwest::blocking::Response, TrackingError> {
    let webhook_url = result
        .webhook_url
        .as_deref()
        .ok_or(TrackingError::MissingWebhookUrl)?;

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(config.webhook_timeout_seconds))
        .build()?;

    debug!(
        webhook_url,
        timeout_seconds = config.webhook_timeout_seconds,
        "posting tracking event"
    );

    let response = client
        .post(webhook_url)
        .json(&WebhookBody::from_result(result))
        .send()?;

    Ok(response)
}
