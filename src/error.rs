//! Error types for tracking link encoding, decoding, and delivery.

use thiserror::Error;

use crate::types::LinkKind;

/// Errors that can occur while building, decoding, or delivering tracking
/// links.
///
/// Decoding failures (bad base64, failed decryption, malformed payload) are
/// always surfaced to the caller; the codec never swallows them. Host HTTP
/// layers are expected to translate anything where
/// [`TrackingError::is_decoding_error`] returns true into a not-found
/// response.
#[derive(Error, Debug)]
pub enum TrackingError {
    /// The token is not valid URL-safe base64.
    #[error("invalid base64 in tracking token: {0}")]
    InvalidToken(#[from] base64::DecodeError),

    /// The token failed Fernet authentication or is truncated/corrupted.
    #[error("tracking token failed decryption")]
    DecryptionFailed,

    /// The decoded payload bytes are not valid UTF-8.
    #[error("tracking payload is not valid UTF-8 text")]
    InvalidUtf8,

    /// The decoded payload is not valid JSON.
    #[error("tracking payload is not valid JSON: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// No base tracking URL of the required kind is configured.
    #[error("no base {0} tracking URL configured")]
    MissingBaseUrl(LinkKind),

    /// The configured base tracking URL cannot be parsed.
    #[error("invalid base tracking URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    /// The configured encryption key is not valid Fernet key material.
    #[error("invalid Fernet encryption key")]
    InvalidEncryptionKey,

    /// The configured text encoding is not supported.
    #[error("unsupported text encoding: {0}")]
    UnsupportedEncoding(String),

    /// A webhook send was requested for a result that carries no webhook URL.
    #[error("tracking result has no webhook URL")]
    MissingWebhookUrl,

    /// The webhook POST failed at the transport level (connect, timeout,
    /// non-HTTP error). Never retried here.
    #[error("webhook delivery failed: {0}")]
    Webhook(#[from] reqwest::Error),

    /// HTML rewriting failed.
    #[error("HTML rewriting failed: {0}")]
    HtmlRewrite(String),
}

impl TrackingError {
    /// Whether this error arose from decoding an incoming token.
    ///
    /// These are the errors a tracking endpoint should answer with a
    /// not-found response rather than a server error.
    pub fn is_decoding_error(&self) -> bool {
        matches!(
            self,
            TrackingError::InvalidToken(_)
                | TrackingError::DecryptionFailed
                | TrackingError::InvalidUtf8
                | TrackingError::InvalidPayload(_)
        )
    }
}
