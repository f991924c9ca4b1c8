//! Link-generation and decoding configuration.
//!
//! A [`Configuration`] is built once and treated as immutable: merging in
//! overrides produces a new instance rather than mutating in place, so
//! concurrent callers holding different configurations never interfere.

use fernet::Fernet;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::core::payload::{merge_metadata, Payload};
use crate::error::TrackingError;
use crate::types::LinkKind;

/// Default webhook timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 5;

fn default_encoding() -> String {
    "utf-8".to_string()
}

/// Parameters controlling how tracking links are generated and decoded.
///
/// Two configurations are interchangeable for decoding if they agree on
/// `encryption_key`, `encoding`, and (when `include_default_metadata` is
/// false) `default_metadata`; base URLs only matter when extracting a token
/// from a full URL or generating links.
///
/// `Deserialize` is derived so hosts can load a configuration from their
/// settings layer; unknown keys are ignored at that boundary rather than
/// inside the codec.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Webhook to notify when a click or open is registered.
    pub webhook_url: Option<String>,
    /// Upper bound on how long a webhook POST may block.
    pub webhook_timeout_seconds: u64,
    /// If true, the webhook URL travels inside the encoded payload and the
    /// decoder reads it back from there instead of from this configuration.
    pub include_webhook_url: bool,
    /// Base URL prepended to open tracking tokens.
    pub base_open_tracking_url: Option<String>,
    /// Base URL prepended to click tracking tokens.
    pub base_click_tracking_url: Option<String>,
    /// Metadata associated with every link.
    pub default_metadata: Option<Map<String, Value>>,
    /// If true, defaults are embedded in the payload at encode time so they
    /// survive decoding under a different configuration; if false, the
    /// decoding side's own defaults are applied instead.
    pub include_default_metadata: bool,
    /// Base64 Fernet key material. When set, tokens are
    /// authenticated-encrypted instead of base64-encoded.
    pub encryption_key: Option<String>,
    /// Text encoding of the payload bytes. Only UTF-8 is supported.
    pub encoding: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            webhook_url: None,
            webhook_timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            include_webhook_url: false,
            base_open_tracking_url: None,
            base_click_tracking_url: None,
            default_metadata: None,
            include_default_metadata: false,
            encryption_key: None,
            encoding: default_encoding(),
        }
    }
}

/// A partial [`Configuration`]: every field optional.
///
/// This is the typed replacement for loose keyword-argument absorption.
/// A `Some` field overrides the corresponding configuration field; `None`
/// leaves it alone. Unknown keys are dropped when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfigurationOverrides {
    pub webhook_url: Option<String>,
    pub webhook_timeout_seconds: Option<u64>,
    pub include_webhook_url: Option<bool>,
    pub base_open_tracking_url: Option<String>,
    pub base_click_tracking_url: Option<String>,
    pub default_metadata: Option<Map<String, Value>>,
    pub include_default_metadata: Option<bool>,
    pub encryption_key: Option<String>,
    pub encoding: Option<String>,
}

impl Configuration {
    /// Return a new configuration with every `Some` field of `overrides`
    /// applied on top of `self`. Overrides take precedence.
    ///
    /// No cipher state is carried over: the Fernet cipher is derived from
    /// key material on demand, so a merge that changes the key can never
    /// observe a stale cipher.
    pub fn with_overrides(&self, overrides: &ConfigurationOverrides) -> Configuration {
        let mut merged = self.clone();

        if let Some(v) = &overrides.webhook_url {
            merged.webhook_url = Some(v.clone());
        }
        if let Some(v) = overrides.webhook_timeout_seconds {
            merged.webhook_timeout_seconds = v;
        }
        if let Some(v) = overrides.include_webhook_url {
            merged.include_webhook_url = v;
        }
        if let Some(v) = &overrides.base_open_tracking_url {
            merged.base_open_tracking_url = Some(v.clone());
        }
        if let Some(v) = &overrides.base_click_tracking_url {
            merged.base_click_tracking_url = Some(v.clone());
        }
        if let Some(v) = &overrides.default_metadata {
            merged.default_metadata = Some(v.clone());
        }
        if let Some(v) = overrides.include_default_metadata {
            merged.include_default_metadata = v;
        }
        if let Some(v) = &overrides.encryption_key {
            merged.encryption_key = Some(v.clone());
        }
        if let Some(v) = &overrides.encoding {
            merged.encoding = v.clone();
        }

        merged
    }

    /// Build the payload to embed for one link.
    ///
    /// `url` is included only when non-empty. Metadata is seeded from the
    /// configured defaults only when `include_default_metadata` is set, then
    /// overlaid with `extra_metadata` (extra wins on collision, one level
    /// deep). The webhook URL is embedded only when `include_webhook_url`
    /// is set and a webhook URL is configured.
    pub fn build_payload(
        &self,
        url_to_track: Option<&str>,
        extra_metadata: Option<&Map<String, Value>>,
    ) -> Payload {
        let url = match url_to_track {
            Some(u) if !u.is_empty() => Some(u.to_string()),
            _ => None,
        };

        let defaults = if self.include_default_metadata {
            self.default_metadata.as_ref()
        } else {
            None
        };
        let metadata = merge_metadata(defaults, extra_metadata);
        let metadata = if metadata.is_empty() {
            None
        } else {
            Some(metadata)
        };

        let webhook = if self.include_webhook_url {
            self.webhook_url.clone()
        } else {
            None
        };

        Payload {
            url,
            metadata,
            webhook,
        }
    }

    /// Derive the Fernet cipher from the configured key material, if any.
    pub fn cipher(&self) -> Result<Option<Fernet>, TrackingError> {
        match &self.encryption_key {
            Some(key) => Fernet::new(key)
                .map(Some)
                .ok_or(TrackingError::InvalidEncryptionKey),
            None => Ok(None),
        }
    }

    /// The configured base URL for the given link kind, if any.
    pub fn base_tracking_url(&self, kind: LinkKind) -> Option<&str> {
        match kind {
            LinkKind::Click => self.base_click_tracking_url.as_deref(),
            LinkKind::Open => self.base_open_tracking_url.as_deref(),
        }
    }

    /// Check that the configured text encoding is one we can honor.
    ///
    /// Rust strings are UTF-8, so that is the only supported value; the
    /// field exists for configuration compatibility.
    pub fn ensure_supported_encoding(&self) -> Result<(), TrackingError> {
        let normalized = self.encoding.to_ascii_lowercase();
        if normalized == "utf-8" || normalized == "utf8" {
            Ok(())
        } else {
            Err(TrackingError::UnsupportedEncoding(self.encoding.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => panic!("expected a JSON object"),
        }
    }

    #[test]
    fn test_defaults() {
        let config = Configuration::default();
        assert_eq!(config.webhook_timeout_seconds, 5);
        assert_eq!(config.encoding, "utf-8");
        assert!(!config.include_webhook_url);
        assert!(!config.include_default_metadata);
        assert!(config.webhook_url.is_none());
    }

    #[test]
    fn test_overrides_take_precedence() {
        let base = Configuration {
            webhook_url: Some("https://old.example.com/hook".to_string()),
            webhook_timeout_seconds: 10,
            ..Configuration::default()
        };
        let overrides = ConfigurationOverrides {
            webhook_url: Some("https://new.example.com/hook".to_string()),
            include_webhook_url: Some(true),
            ..ConfigurationOverrides::default()
        };

        let merged = base.with_overrides(&overrides);
        assert_eq!(
            merged.webhook_url.as_deref(),
            Some("https://new.example.com/hook")
        );
        assert!(merged.include_webhook_url);
        // Untouched fields survive the merge.
        assert_eq!(merged.webhook_timeout_seconds, 10);

        // The original is unchanged.
        assert_eq!(
            base.webhook_url.as_deref(),
            Some("https://old.example.com/hook")
        );
    }

    #[test]
    fn test_overrides_ignore_unknown_keys() {
        let overrides: ConfigurationOverrides = serde_json::from_value(json!({
            "webhook_timeout_seconds": 30,
            "some_future_option": true,
        }))
        .unwrap();

        assert_eq!(overrides.webhook_timeout_seconds, Some(30));
    }

    #[test]
    fn test_configuration_from_settings_ignores_unknown_keys() {
        let config: Configuration = serde_json::from_value(json!({
            "base_click_tracking_url": "https://t.example.com/c/",
            "not_a_real_field": 1,
        }))
        .unwrap();

        assert_eq!(
            config.base_click_tracking_url.as_deref(),
            Some("https://t.example.com/c/")
        );
        assert_eq!(config.webhook_timeout_seconds, 5);
    }

    #[test]
    fn test_build_payload_empty() {
        let config = Configuration::default();
        let payload = config.build_payload(None, None);
        assert_eq!(payload, Payload::default());
    }

    #[test]
    fn test_build_payload_skips_empty_url() {
        let config = Configuration::default();
        let payload = config.build_payload(Some(""), None);
        assert!(payload.url.is_none());
    }

    #[test]
    fn test_build_payload_defaults_only_when_included() {
        let defaults = map(json!({"campaign": "spring"}));
        let extra = map(json!({"recipient": 42}));

        let mut config = Configuration {
            default_metadata: Some(defaults),
            ..Configuration::default()
        };

        // Not included: only the extra metadata is embedded.
        let payload = config.build_payload(None, Some(&extra));
        assert_eq!(
            payload.metadata.map(Value::Object),
            Some(json!({"recipient": 42}))
        );

        // Included: defaults are embedded underneath the extras.
        config.include_default_metadata = true;
        let payload = config.build_payload(None, Some(&extra));
        assert_eq!(
            payload.metadata.map(Value::Object),
            Some(json!({"campaign": "spring", "recipient": 42}))
        );
    }

    #[test]
    fn test_build_payload_webhook_embedding() {
        let mut config = Configuration {
            webhook_url: Some("https://hook.example.com/".to_string()),
            ..Configuration::default()
        };

        assert!(config.build_payload(None, None).webhook.is_none());

        config.include_webhook_url = true;
        assert_eq!(
            config.build_payload(None, None).webhook.as_deref(),
            Some("https://hook.example.com/")
        );

        // Flag set but no webhook URL configured: nothing to embed.
        config.webhook_url = None;
        assert!(config.build_payload(None, None).webhook.is_none());
    }

    #[test]
    fn test_cipher_requires_valid_key() {
        let config = Configuration::default();
        assert!(config.cipher().unwrap().is_none());

        let config = Configuration {
            encryption_key: Some(Fernet::generate_key()),
            ..Configuration::default()
        };
        assert!(config.cipher().unwrap().is_some());

        let config = Configuration {
            encryption_key: Some("not a key".to_string()),
            ..Configuration::default()
        };
        assert!(matches!(
            config.cipher(),
            Err(TrackingError::InvalidEncryptionKey)
        ));
    }

    #[test]
    fn test_encoding_support() {
        let config = Configuration::default();
        assert!(config.ensure_supported_encoding().is_ok());

        let config = Configuration {
            encoding: "UTF-8".to_string(),
            ..Configuration::default()
        };
        assert!(config.ensure_supported_encoding().is_ok());

        let config = Configuration {
            encoding: "latin-1".to_string(),
            ..Configuration::default()
        };
        assert!(matches!(
            config.ensure_supported_encoding(),
            Err(TrackingError::UnsupportedEncoding(_))
        ));
    }
}
