//! The payload embedded inside a tracking token.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The data carried inside an encoded tracking token.
///
/// Every field is optional and absent fields are omitted from the JSON
/// entirely; an empty payload serializes to `{}`. An absent key is not the
/// same thing as a key with a null or empty value: the builder never emits
/// `"metadata": {}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    /// Destination URL, present only for click links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Per-link metadata, present only if non-empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    /// Webhook URL, present only when the configuration embeds it per link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook: Option<String>,
}

/// Shallow-merge two optional metadata maps, one level deep.
///
/// Keys from `overlay` win on collision. Returns an empty map when both
/// inputs are absent.
pub fn merge_metadata(
    base: Option<&Map<String, Value>>,
    overlay: Option<&Map<String, Value>>,
) -> Map<String, Value> {
    let mut merged = Map::new();
    if let Some(base) = base {
        merged.extend(base.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    if let Some(overlay) = overlay {
        merged.extend(overlay.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    merged
}
