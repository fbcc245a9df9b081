//! HTTP response data models.
//!
//! A response is recorded against the id of the API request that produced it.
//! The template engine reads stored responses back through `{{get(id, path)}}`.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Represents an HTTP response received for a stored API request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpResponse {
    /// Identifier of the API request this response belongs to.
    pub api: String,

    /// HTTP status code (e.g., 200, 404, 500).
    pub status: u16,

    /// Response headers; a name may carry several values (e.g. Set-Cookie).
    pub headers: HashMap<String, Vec<String>>,

    /// Response body as raw bytes.
    pub body: Vec<u8>,

    /// Round trip latency in milliseconds.
    pub latency: u64,
}

/// Decoded view of a response body.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseBody {
    /// Parsed JSON document, when the body is JSON.
    pub json: Option<JsonValue>,

    /// Body text (invalid UTF-8 sequences are replaced).
    pub raw: String,

    /// Body size in bytes.
    pub size: usize,
}

impl HttpResponse {
    /// Creates a response with the given request id and status and an empty body.
    pub fn new(api: impl Into<String>, status: u16) -> Self {
        Self {
            api: api.into(),
            status,
            headers: HashMap::new(),
            body: Vec::new(),
            latency: 0,
        }
    }

    /// Appends a header value.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.entry(name.into()).or_default().push(value.into());
    }

    /// Sets the response body.
    pub fn set_body(&mut self, body: Vec<u8>) {
        self.body = body;
    }

    /// Gets the first Content-Type header value if present.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
            .and_then(|(_, v)| v.first())
            .map(|v| v.as_str())
    }

    /// Decodes the body, parsing it as JSON when the content type says so or
    /// when the text is shaped like a JSON object or array.
    pub fn body(&self) -> ResponseBody {
        let raw = String::from_utf8_lossy(&self.body).into_owned();
        let declared_json = self
            .content_type()
            .map(|ct| ct.to_ascii_lowercase().contains("json"))
            .unwrap_or(false);

        let json = if declared_json || is_json(raw.trim()) {
            serde_json::from_str(raw.trim()).ok()
        } else {
            None
        };

        ResponseBody {
            json,
            raw,
            size: self.body.len(),
        }
    }
}

/// Checks whether the text starts and ends with a matching pair of JSON
/// brackets (`{}` or `[]`). Surrounding whitespace counts, so callers that
/// tolerate padding trim first.
pub fn is_json(text: &str) -> bool {
    if text.len() < 2 {
        return false;
    }
    matches!(
        (text.chars().next(), text.chars().last()),
        (Some('{'), Some('}')) | (Some('['), Some(']'))
    )
}
