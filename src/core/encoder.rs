//! Tracking link encoding.
//!
//! This module turns a payload into an opaque token and joins it onto the
//! configured base tracking URL.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use crate::config::Configuration;
use crate::core::payload::Payload;
use crate::error::TrackingError;
use crate::types::LinkKind;

/// Encode a payload into a URL-safe token.
///
/// The payload is serialized to JSON bytes and then either
/// authenticated-encrypted with the configured Fernet key (a fresh random
/// nonce is used each time, so two encodes of the same payload produce
/// different tokens) or, without a key, encoded as URL-safe base64 with
/// padding retained (deterministic).
///
/// Both output alphabets are already URL-safe; the token must not be
/// percent-escaped again.
///
/// # Examples
///
/// ```
/// use tracklink::{Configuration, Payload, encode_payload};
///
/// let config = Configuration::default();
/// let token = encode_payload(&Payload::default(), &config)?;
/// assert_eq!(token, "e30=");
/// # Ok::<(), tracklink::TrackingError>(())
/// ```
pub fn encode_payload(payload: &Payload, config: &Configuration) -> Result<String, TrackingError> {
    config.ensure_supported_encoding()?;

    let json_bytes = serde_json::to_vec(payload)?;

    let token = match config.cipher()? {
        Some(cipher) => cipher.encrypt(&json_bytes),
        None => URL_SAFE.encode(&json_bytes),
    };

    debug!(
        encrypted = config.encryption_key.is_some(),
        token_len = token.len(),
        "encoded tracking payload"
    );

    Ok(token)
}

/// Join a token onto the base URL configured for `kind`.
///
/// Uses standard relative-URL resolution, so a base of
/// `https://t.example.com/c/` plus token `e30=` yields
/// `https://t.example.com/c/e30=`. Tokens never contain a scheme, so they
/// can never replace the base.
pub fn tracking_url(
    payload: &Payload,
    kind: LinkKind,
    config: &Configuration,
) -> Result<String, TrackingError> {
    let base = config
        .base_tracking_url(kind)
        .ok_or(TrackingError::MissingBaseUrl(kind))?;

    let token = encode_payload(payload, config)?;
    let joined = Url::parse(base)?.join(&token)?;

    Ok(joined.into())
}

/// Build a full open tracking URL encoding the given metadata.
pub fn get_open_tracking_url(
    metadata: Option<&Map<String, Value>>,
    config: &Configuration,
) -> Result<String, TrackingError> {
    let payload = config.build_payload(None, metadata);
    tracking_url(&payload, LinkKind::Open, config)
}

/// Build a full click tracking URL wrapping `url_to_track` and encoding the
/// given metadata.
pub fn get_click_tracking_url(
    url_to_track: &str,
    metadata: Option<&Map<String, Value>>,
    config: &Configuration,
) -> Result<String, TrackingError> {
    let payload = config.build_payload(Some(url_to_track), metadata);
    tracking_url(&payload, LinkKind::Click, config)
}
