//! Core data structures shared across encoding, decoding, and delivery.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// A transparent 1x1 PNG served for open tracking requests.
pub const TRACKING_PIXEL: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d,
    0x49, 0x48, 0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01,
    0x08, 0x04, 0x00, 0x00, 0x00, 0xb5, 0x1c, 0x0c, 0x02, 0x00, 0x00, 0x00,
    0x0b, 0x49, 0x44, 0x41, 0x54, 0x78, 0xda, 0x63, 0x64, 0x60, 0x00, 0x00,
    0x00, 0x06, 0x00, 0x02, 0x30, 0x81, 0xd0, 0x2f, 0x00, 0x00, 0x00, 0x00,
    0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

/// MIME type of [`TRACKING_PIXEL`].
pub const PNG_MIME_TYPE: &str = "image/png";

/// Returns the transparent pixel and its MIME type, ready to serve as the
/// body of an open tracking response.
pub fn open_tracking_pixel() -> (&'static [u8], &'static str) {
    (TRACKING_PIXEL, PNG_MIME_TYPE)
}

/// The two kinds of tracking link.
///
/// Selects which configured base URL an operation uses, and names the
/// missing one in errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// A link that redirects to a wrapped destination URL.
    Click,
    /// A link that serves a pixel image to signal an open.
    Open,
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkKind::Click => write!(f, "click"),
            LinkKind::Open => write!(f, "open"),
        }
    }
}

/// A decoded tracking event.
///
/// Produced only by the decoder; constructed fresh on every decode and never
/// mutated afterwards. Exactly one of `is_open_tracking` and
/// `is_click_tracking` is true.
///
/// The `Serialize` implementation emits fields in a fixed, stable order
/// (`is_open_tracking, is_click_tracking, tracked_url, webhook_url,
/// metadata, request_data, timestamp`) so results can cross process
/// boundaries safely, e.g. for logging or for a host web framework to
/// re-expose.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackingResult {
    /// Whether this event came from an open tracking link.
    pub is_open_tracking: bool,
    /// Whether this event came from a click tracking link.
    pub is_click_tracking: bool,
    /// The URL to redirect to. `None` for open tracking, and also for a
    /// click link that was encoded without a destination; callers must
    /// treat that as a not-found condition.
    pub tracked_url: Option<String>,
    /// Where to relay this event, if anywhere.
    pub webhook_url: Option<String>,
    /// Fully merged metadata (configured defaults overlaid by the
    /// per-link metadata embedded in the token).
    pub metadata: Map<String, Value>,
    /// Opaque request data supplied by the host HTTP layer (typically
    /// `user_agent` and `user_ip`). Never interpreted here.
    pub request_data: Option<Map<String, Value>>,
    /// Seconds since epoch, captured when the token was decoded.
    pub timestamp: i64,
}
