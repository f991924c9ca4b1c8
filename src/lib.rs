//! tracklink - reversible click and open tracking links
//!
//! This crate encodes tracking metadata (a destination URL and/or arbitrary
//! key-value metadata) into an opaque, reversible token embedded in a URL
//! path segment, and decodes that token back into a structured
//! [`TrackingResult`] when the link is visited.
//!
//! # Features
//!
//! - **Stateless**: every click/open event is self-contained in the URL; no
//!   storage, deduplication, or scheduling anywhere
//! - **Two link kinds**: click links redirect to a wrapped destination URL,
//!   open links serve a transparent 1x1 PNG
//! - **Two transports**: deterministic URL-safe base64, or Fernet
//!   authenticated encryption when a key is configured
//! - **Portable or lean tokens**: configuration flags choose whether default
//!   metadata and the webhook URL travel inside the token or stay
//!   server-side
//! - **HTML post-processing**: rewrite a document's absolute links into
//!   click tracking links and append an open tracking pixel
//! - **Webhook relay**: POST decoded events as JSON to a remote endpoint
//!
//! # Quick Start
//!
//! ```
//! use serde_json::{json, Map, Value};
//! use tracklink::{get_click_tracking_result, get_click_tracking_url, Configuration};
//!
//! let config = Configuration {
//!     base_click_tracking_url: Some("https://track.example.com/c/".to_string()),
//!     ..Configuration::default()
//! };
//!
//! let mut metadata = Map::new();
//! metadata.insert("campaign".to_string(), json!("spring"));
//!
//! // Generate a tracking link wrapping a destination URL.
//! let link = get_click_tracking_url("https://example.com/page", Some(&metadata), &config)?;
//! assert!(link.starts_with("https://track.example.com/c/"));
//!
//! // Later, when the link is visited, decode it back.
//! let result = get_click_tracking_result(&link, None, &config)?;
//! assert_eq!(result.tracked_url.as_deref(), Some("https://example.com/page"));
//! assert_eq!(result.metadata["campaign"], json!("spring"));
//! # Ok::<(), tracklink::TrackingError>(())
//! ```
//!
//! # Token format
//!
//! - Unencrypted: `base64url(JSON(payload))` with standard `=` padding.
//! - Encrypted: a Fernet token (versioned, self-describing, carries its own
//!   nonce) over the JSON payload bytes; URL-safe as produced, and
//!   non-deterministic by design.
//!
//! The payload schema is `{ "url": string?, "metadata": object?,
//! "webhook": string? }` with absent keys omitted entirely.
//!
//! # Error Handling
//!
//! All fallible operations return `Result<T, TrackingError>`. Decoding
//! failures (bad base64, failed authentication, malformed JSON) can be
//! distinguished with [`TrackingError::is_decoding_error`] so tracking
//! endpoints can answer them with a not-found response.

// Re-export the codec operations
pub use self::core::{
    decode_path, encode_payload, get_click_tracking_result, get_click_tracking_url,
    get_click_tracking_url_path, get_open_tracking_result, get_open_tracking_url,
    get_open_tracking_url_path, merge_metadata, tracking_path, tracking_url, Payload,
};

// Re-export configuration and result types
pub use config::{Configuration, ConfigurationOverrides, DEFAULT_TIMEOUT_SECONDS};
pub use error::TrackingError;
pub use types::{open_tracking_pixel, LinkKind, TrackingResult, PNG_MIME_TYPE, TRACKING_PIXEL};

// Re-export the collaborator-facing adapters
pub use handler::{
    handle_tracking_request, request_data, NoopHandler, TrackingEventHandler, TrackingResponse,
};
pub use html::adapt_html;
pub use webhook::send_webhook;

// Module declarations
pub mod config;
pub mod core;
pub mod error;
pub mod handler;
pub mod html;
pub mod types;
pub mod webhook;
