//! Core tracking link codec.
//!
//! This module contains the main operations:
//! - Building the payload embedded in a token
//! - Encoding payloads into URL-safe tokens and full tracking URLs
//! - Decoding tokens back into tracking results

pub mod decoder;
pub mod encoder;
pub mod payload;

// Re-export main functionality
pub use decoder::{
    decode_path, get_click_tracking_result, get_click_tracking_url_path,
    get_open_tracking_result, get_open_tracking_url_path, tracking_path,
};
pub use encoder::{encode_payload, get_click_tracking_url, get_open_tracking_url, tracking_url};
pub use payload::{merge_metadata, Payload};
