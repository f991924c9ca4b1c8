//! Framework-neutral handling of incoming tracking requests.
//!
//! Host HTTP layers adapt their request type into a `request_data` map,
//! call [`handle_tracking_request`], and translate the returned
//! [`TrackingResponse`] into their own response type. Notification hooks
//! are injected through [`TrackingEventHandler`].

use serde_json::{Map, Value};
use tracing::warn;

use crate::config::Configuration;
use crate::core::decoder::decode_path;
use crate::error::TrackingError;
use crate::types::{open_tracking_pixel, LinkKind, TrackingResult};

/// Build the opaque `request_data` map from what the host HTTP layer knows
/// about the client. The codec passes it through untouched.
pub fn request_data(user_agent: Option<&str>, user_ip: Option<&str>) -> Map<String, Value> {
    let mut data = Map::new();
    data.insert(
        "user_agent".to_string(),
        user_agent.map_or(Value::Null, |ua| Value::String(ua.to_string())),
    );
    data.insert(
        "user_ip".to_string(),
        user_ip.map_or(Value::Null, |ip| Value::String(ip.to_string())),
    );
    data
}

/// Notification hooks invoked around decoding.
///
/// Both default to no-ops; implement whichever you need.
pub trait TrackingEventHandler {
    /// Called after a tracking link has been decoded, before the response
    /// is produced.
    fn on_tracking_event(&self, _result: &TrackingResult) {}

    /// Called when decoding an incoming link fails, before the not-found
    /// response is produced.
    fn on_decoding_error(&self, _error: &TrackingError) {}
}

/// A handler that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHandler;

impl TrackingEventHandler for NoopHandler {}

/// What the host HTTP layer should answer with.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackingResponse {
    /// Redirect (3xx) to the decoded destination URL.
    Redirect(String),
    /// Serve these bytes with this MIME type.
    Pixel(&'static [u8], &'static str),
    /// Answer not-found: the link failed to decode, or a click link carried
    /// no destination.
    NotFound,
}

/// Decode an incoming tracking request and decide the response.
///
/// Decoding errors are reported to the handler and answered with
/// [`TrackingResponse::NotFound`]; a click decode with no tracked URL is
/// also not-found. Successful decodes are reported through
/// `on_tracking_event` before the redirect or pixel response is returned.
pub fn handle_tracking_request(
    path: &str,
    request_data: Option<Map<String, Value>>,
    kind: LinkKind,
    config: &Configuration,
    handler: &dyn TrackingEventHandler,
) -> TrackingResponse {
    let is_open = kind == LinkKind::Open;

    let result = match decode_path(path, request_data, is_open, config) {
        Ok(result) => result,
        Err(error) => {
            warn!(kind = %kind, %error, "failed to decode tracking path");
            handler.on_decoding_error(&error);
            return TrackingResponse::NotFound;
        }
    };

    match kind {
        LinkKind::Click => match result.tracked_url.clone() {
            Some(url) => {
                handler.on_tracking_event(&result);
                TrackingResponse::Redirect(url)
            }
            None => TrackingResponse::NotFound,
        },
        LinkKind::Open => {
            handler.on_tracking_event(&result);
            let (pixel, mime) = open_tracking_pixel();
            TrackingResponse::Pixel(pixel, mime)
        }
    }
}
