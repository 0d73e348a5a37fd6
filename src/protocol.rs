//! Wire format and endpoint resolution
//!
//! Each inbound text frame is a JSON object with an optional numeric
//! `value` and an optional string `error`. Any other fields are ignored.
//!
//! The WebSocket endpoint lives at a fixed path on the serving host, and its
//! scheme mirrors the scheme of the page URL: `https` pages use `wss`,
//! everything else uses `ws`.

use crate::error::{Result, ScopeError};
use serde_json::{Map, Value};
use tokio_tungstenite::tungstenite::http::Uri;

/// Fixed path of the sample stream on the serving host
pub const DEFAULT_WS_PATH: &str = "/ws";

/// A decoded inbound message
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InboundMessage {
    /// Raw `value` field; `null` counts as absent
    value: Option<Value>,
    /// `error` field, when it is a string
    pub error: Option<String>,
}

impl InboundMessage {
    /// Parse a text frame.
    ///
    /// Anything other than a JSON object is a payload error. The `value` and
    /// `error` fields are read independently, so a mistyped one never hides
    /// the other.
    pub fn decode(text: &str) -> Result<Self> {
        let mut fields: Map<String, Value> = serde_json::from_str(text)?;

        let value = fields.remove("value").filter(|v| !v.is_null());
        let error = match fields.remove("error") {
            Some(Value::String(error)) => Some(error),
            Some(Value::Null) | None => None,
            Some(other) => {
                tracing::debug!("ignoring non-string error field: {}", other);
                None
            }
        };

        Ok(Self { value, error })
    }

    /// Numeric `value`, if present and a number
    pub fn value(&self) -> Option<f64> {
        self.value.as_ref().and_then(Value::as_f64)
    }

    /// The carried sample, rejecting non-numbers, NaN and infinities
    pub fn sample(&self) -> Option<Result<f64>> {
        self.value.as_ref().map(|raw| match raw.as_f64() {
            Some(v) if v.is_finite() => Ok(v),
            Some(v) => Err(ScopeError::NonFiniteSample(v)),
            None => Err(ScopeError::InvalidSample(raw.to_string())),
        })
    }
}

/// Build the WebSocket URL for a page served from `page_url`.
///
/// `page_url` must carry a scheme and a host, e.g. `http://127.0.0.1:8000`.
/// Any path or query on the page URL is discarded.
pub fn endpoint_url(page_url: &str, ws_path: &str) -> Result<String> {
    let invalid = |reason: &str| ScopeError::InvalidEndpoint {
        url: page_url.to_string(),
        reason: reason.to_string(),
    };

    let uri: Uri = page_url
        .trim()
        .parse()
        .map_err(|e: tokio_tungstenite::tungstenite::http::uri::InvalidUri| invalid(&e.to_string()))?;

    let scheme = match uri.scheme_str() {
        Some("https") | Some("wss") => "wss",
        Some("http") | Some("ws") => "ws",
        Some(other) => return Err(invalid(&format!("unsupported scheme '{}'", other))),
        None => return Err(invalid("missing scheme")),
    };
    let authority = uri.authority().ok_or_else(|| invalid("missing host"))?;

    let path = if ws_path.starts_with('/') {
        ws_path.to_string()
    } else {
        format!("/{}", ws_path)
    };

    Ok(format!("{}://{}{}", scheme, authority, path))
}
