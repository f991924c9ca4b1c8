//! Tracking link decoding.
//!
//! A single-shot pure transform from an encoded URL path back to a
//! [`TrackingResult`]. Failure at any step aborts with no partial result;
//! the caller (typically the host HTTP layer) decides how to respond.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use chrono::Utc;
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::Configuration;
use crate::core::payload::{merge_metadata, Payload};
use crate::error::TrackingError;
use crate::types::{LinkKind, TrackingResult};

/// Extract the encoded token from a full tracking URL.
///
/// Requires a base URL of the matching kind to be configured
/// ([`TrackingError::MissingBaseUrl`] otherwise). When `url` starts with
/// that base the prefix is stripped; when it does not, `url` is returned
/// unchanged, so already-bare tokens pass through and the operation is
/// idempotent.
pub fn tracking_path<'a>(
    url: &'a str,
    kind: LinkKind,
    config: &Configuration,
) -> Result<&'a str, TrackingError> {
    let base = config
        .base_tracking_url(kind)
        .ok_or(TrackingError::MissingBaseUrl(kind))?;

    Ok(url.strip_prefix(base).unwrap_or(url))
}

/// Decode an encoded URL path into a [`TrackingResult`].
///
/// The path may still carry the configured base URL prefix and/or one
/// leading `/`; both are stripped. The remaining token is Fernet-decrypted
/// when an encryption key is configured, otherwise base64url-decoded, and
/// the resulting JSON payload is reconstructed into a result:
///
/// - metadata starts from the configured defaults only when
///   `include_default_metadata` is false (complementary to encoding, where
///   the flag embeds them), then the payload's own metadata is overlaid and
///   wins on collision;
/// - the webhook URL is read from the payload when `include_webhook_url` is
///   set, otherwise from the configuration;
/// - `tracked_url` comes from the payload's `url` field; a click decode
///   with no tracked URL must be treated by callers as "no redirect
///   target".
pub fn decode_path(
    encoded_path: &str,
    request_data: Option<Map<String, Value>>,
    is_open: bool,
    config: &Configuration,
) -> Result<TrackingResult, TrackingError> {
    config.ensure_supported_encoding()?;

    let timestamp = Utc::now().timestamp();
    let kind = if is_open {
        LinkKind::Open
    } else {
        LinkKind::Click
    };

    let mut path = encoded_path;
    if let Some(base) = config.base_tracking_url(kind) {
        path = path.strip_prefix(base).unwrap_or(path);
    }
    path = path.strip_prefix('/').unwrap_or(path);

    let json_bytes = match config.cipher()? {
        Some(cipher) => cipher
            .decrypt(path)
            .map_err(|_| TrackingError::DecryptionFailed)?,
        None => URL_SAFE.decode(path)?,
    };

    let json_text = std::str::from_utf8(&json_bytes).map_err(|_| TrackingError::InvalidUtf8)?;
    let payload: Payload = serde_json::from_str(json_text)?;

    let defaults = if config.include_default_metadata {
        None
    } else {
        config.default_metadata.as_ref()
    };
    let metadata = merge_metadata(defaults, payload.metadata.as_ref());

    let webhook_url = if config.include_webhook_url {
        payload.webhook
    } else {
        config.webhook_url.clone()
    };

    debug!(kind = %kind, has_url = payload.url.is_some(), "decoded tracking path");

    Ok(TrackingResult {
        is_open_tracking: is_open,
        is_click_tracking: !is_open,
        tracked_url: payload.url,
        webhook_url,
        metadata,
        request_data,
        timestamp,
    })
}

/// Decode a click tracking link (bare token or full URL) into a result.
pub fn get_click_tracking_result(
    encoded_path: &str,
    request_data: Option<Map<String, Value>>,
    config: &Configuration,
) -> Result<TrackingResult, TrackingError> {
    decode_path(encoded_path, request_data, false, config)
}

/// Decode an open tracking link (bare token or full URL) into a result.
pub fn get_open_tracking_result(
    encoded_path: &str,
    request_data: Option<Map<String, Value>>,
    config: &Configuration,
) -> Result<TrackingResult, TrackingError> {
    decode_path(encoded_path, request_data, true, config)
}

/// Extract the token part of a full click tracking URL.
pub fn get_click_tracking_url_path<'a>(
    url: &'a str,
    config: &Configuration,
) -> Result<&'a str, TrackingError> {
    tracking_path(url, LinkKind::Click, config)
}

/// Extract the token part of a full open tracking URL.
pub fn get_open_tracking_url_path<'a>(
    url: &'a str,
    config: &Configuration,
) -> Result<&'a str, TrackingError> {
    tracking_path(url, LinkKind::Open, config)
}
