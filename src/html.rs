//! HTML post-processing: rewrite links for click tracking and append an
//! open tracking pixel.

use lol_html::errors::RewritingError;
use lol_html::html_content::ContentType;
use lol_html::{element, rewrite_str, RewriteStrSettings};
use serde_json::{Map, Value};

use crate::config::Configuration;
use crate::core::encoder::{get_click_tracking_url, get_open_tracking_url};
use crate::error::TrackingError;

/// Whether an href is a candidate for click tracking.
///
/// Only absolute `http://`/`https://` and scheme-relative `//` links are
/// rewritten; `mailto:`, relative, and anchor links are left untouched.
fn is_trackable_link(link: &str) -> bool {
    link.starts_with("http://") || link.starts_with("https://") || link.starts_with("//")
}

/// Minimal attribute-value escaping for the pixel markup.
fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

/// Rewrite an HTML document for tracking.
///
/// With `click_tracking`, every `<a href>` pointing at a trackable link is
/// replaced with a click tracking URL wrapping the original destination and
/// carrying `extra_metadata`. With `open_tracking`, a transparent
/// `<img>` pixel pointing at an open tracking URL is appended as the last
/// child of `<body>`.
///
/// Everything else in the document is preserved, modulo the rewriter's own
/// normalization.
pub fn adapt_html(
    html_text: &str,
    extra_metadata: Option<&Map<String, Value>>,
    click_tracking: bool,
    open_tracking: bool,
    config: &Configuration,
) -> Result<String, TrackingError> {
    // Resolve the pixel URL up front so configuration problems surface
    // before any rewriting happens.
    let pixel_markup = if open_tracking {
        let pixel_url = get_open_tracking_url(extra_metadata, config)?;
        Some(format!(
            r#"<img src="{}" border="0" width="0" height="0" alt="">"#,
            escape_attribute(&pixel_url)
        ))
    } else {
        None
    };

    let mut handlers = Vec::new();

    if click_tracking {
        handlers.push(element!("a[href]", |el| {
            if let Some(href) = el.get_attribute("href") {
                if is_trackable_link(&href) {
                    let tracked = get_click_tracking_url(&href, extra_metadata, config)?;
                    el.set_attribute("href", &tracked)?;
                }
            }
            Ok(())
        }));
    }

    if let Some(pixel) = &pixel_markup {
        handlers.push(element!("body", move |el| {
            el.append(pixel, ContentType::Html);
            Ok(())
        }));
    }

    rewrite_str(
        html_text,
        RewriteStrSettings {
            element_content_handlers: handlers,
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|err| match err {
        // Keep codec errors raised inside a handler typed instead of
        // flattening them to a rewriting failure.
        RewritingError::ContentHandlerError(inner) => match inner.downcast::<TrackingError>() {
            Ok(tracking) => *tracking,
            Err(other) => TrackingError::HtmlRewrite(other.to_string()),
        },
        other => TrackingError::HtmlRewrite(other.to_string()),
    })
}
