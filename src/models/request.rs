//! HTTP request data models.
//!
//! This module defines the request description that flows through the template
//! engine and the cURL importer: method, uri, raw body, normalized content type
//! and ordered key/value lists for headers, query and auth.

use serde::{Deserialize, Serialize};

/// HTTP request method.
///
/// Only the methods the request editor offers are represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HttpMethod {
    /// HTTP GET method - retrieve a resource
    #[default]
    GET,
    /// HTTP POST method - submit data to create a resource
    POST,
    /// HTTP PUT method - replace a resource
    PUT,
    /// HTTP PATCH method - partially modify a resource
    PATCH,
    /// HTTP DELETE method - remove a resource
    DELETE,
    /// HTTP OPTIONS method - describe communication options
    OPTIONS,
    /// HTTP HEAD method - retrieve headers only
    HEAD,
}

impl HttpMethod {
    /// Returns the string representation of the HTTP method.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::OPTIONS => "OPTIONS",
            HttpMethod::HEAD => "HEAD",
        }
    }

    /// Parses a string into an HttpMethod, ignoring case.
    ///
    /// # Returns
    ///
    /// `Some(HttpMethod)` if the string is a supported method, `None` otherwise.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Some(HttpMethod::GET),
            "POST" => Some(HttpMethod::POST),
            "PUT" => Some(HttpMethod::PUT),
            "PATCH" => Some(HttpMethod::PATCH),
            "DELETE" => Some(HttpMethod::DELETE),
            "OPTIONS" => Some(HttpMethod::OPTIONS),
            "HEAD" => Some(HttpMethod::HEAD),
            _ => None,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Well-known content types used by the request editor.
pub mod content_type {
    pub const JSON: &str = "application/json";
    pub const FORM: &str = "application/x-www-form-urlencoded";
}

/// A single key/value entry of a header, query or auth list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KvParam {
    pub key: String,
    pub value: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl KvParam {
    /// Creates an enabled key/value entry.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            enabled: true,
        }
    }
}

/// An API request as edited in a collection or reconstructed from a cURL command.
///
/// Field values may contain `{{fn(args)}}` placeholders which are resolved
/// just before dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpRequest {
    /// HTTP method, `GET` unless set otherwise.
    pub method: HttpMethod,

    /// Origin plus path. Query parameters live in `query`.
    pub uri: String,

    /// Raw request body, possibly empty.
    #[serde(default)]
    pub body: String,

    /// Media type without parameters (everything after `;` is dropped).
    #[serde(default)]
    pub content_type: String,

    /// Ordered request headers, never containing a `Content-Type` entry when
    /// produced by the cURL importer.
    #[serde(default)]
    pub headers: Vec<KvParam>,

    /// Ordered query parameters.
    #[serde(default)]
    pub query: Vec<KvParam>,

    /// Basic-auth credentials; the first enabled entry is used.
    #[serde(default)]
    pub auth: Vec<KvParam>,
}

impl HttpRequest {
    /// Creates a request with the given method and uri and empty lists.
    pub fn new(method: HttpMethod, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            ..Default::default()
        }
    }

    /// Appends an enabled header.
    pub fn add_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.headers.push(KvParam::new(key, value));
    }

    /// Appends an enabled query parameter.
    pub fn add_query(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query.push(KvParam::new(key, value));
    }

    /// Checks if the request has a non-empty body.
    pub fn has_body(&self) -> bool {
        !self.body.is_empty()
    }

    /// Looks up the value of the first enabled header with the given name,
    /// ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|kv| kv.enabled && kv.key.eq_ignore_ascii_case(name))
            .map(|kv| kv.value.as_str())
    }
}

/// A cookie remembered by the client, attached to matching hosts when a
/// request is exported as cURL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
}

impl Cookie {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: domain.into(),
        }
    }
}
