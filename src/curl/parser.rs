//! cURL command parser.
//!
//! Converts a pasted `curl` invocation (bash, PowerShell or CMD flavored,
//! single- or multi-line) into an [`HttpRequest`]. The command is first
//! normalized to one line, split into shell words, then folded token by token
//! through [`reduce`].

use crate::models::{content_type, is_json, HttpMethod, HttpRequest, KvParam};
use base64::{engine::general_purpose, Engine as _};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use url::Url;

/// Errors that can occur while importing or exporting cURL commands.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The text is not a parseable curl command or names no URL.
    InvalidCurlText,
    /// A request uri could not be parsed while generating a command.
    InvalidUrl(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidCurlText => write!(f, "invalid curl text"),
            ParseError::InvalidUrl(uri) => write!(f, "Invalid URL: {}", uri),
        }
    }
}

impl std::error::Error for ParseError {}

static PROMPT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)curl(?:\.exe)?\s+").expect("Failed to compile prompt regex"));
static POSIX_CONTINUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\\s*\r?\n").expect("Failed to compile continuation regex"));
static CMD_CONTINUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\^\s*\r?\n").expect("Failed to compile continuation regex"));
static POWERSHELL_CONTINUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`\s*\r?\n").expect("Failed to compile continuation regex"));
static CMD_QUOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\^\s*""#).expect("Failed to compile quote regex"));
static TRAILING_CARET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\^\s*$").expect("Failed to compile caret regex"));
static NEWLINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r?\n").expect("Failed to compile newline regex"));
static CURL_COMMAND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^curl(\.exe)?(\s+|$)").expect("Failed to compile curl regex"));
static URL_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://").expect("Failed to compile url regex"));

/// Flattens a multi-line curl command into a single line.
///
/// Anything before the `curl` keyword (a shell prompt, a path) is dropped,
/// POSIX `\`, CMD `^` and PowerShell `` ` `` line continuations become spaces,
/// CMD `^"` escapes become plain quotes and `curl.exe` becomes `curl`.
///
/// # Examples
///
/// ```
/// use cyberapi_core::curl::normalize_curl_text;
///
/// let text = "$ curl.exe -H ^\"Accept: */*^\" ^\n  https://example.com ^";
/// let normalized = normalize_curl_text(text);
/// assert!(normalized.starts_with("curl -H \"Accept: */*\""));
/// assert!(normalized.ends_with("https://example.com"));
/// assert!(!normalized.contains('\n'));
/// ```
pub fn normalize_curl_text(text: &str) -> String {
    let mut value = text.trim();
    if let Some(m) = PROMPT_REGEX.find(value) {
        if m.start() > 0 {
            value = &value[m.start()..];
        }
    }

    let value = POSIX_CONTINUATION.replace_all(value, " ");
    let value = CMD_CONTINUATION.replace_all(&value, " ");
    let value = POWERSHELL_CONTINUATION.replace_all(&value, " ");
    let value = CMD_QUOTE.replace_all(&value, "\"");
    let value = TRAILING_CARET.replace_all(&value, "");
    let value = NEWLINE.replace_all(&value, " ").into_owned();

    let lower = value.to_ascii_lowercase();
    if lower.starts_with("curl.exe ") || lower.starts_with("curl ") {
        if let Some((_, rest)) = value.split_once(' ') {
            return format!("curl {}", rest);
        }
    }
    value
}

/// Checks whether normalized text is a curl invocation.
pub fn is_curl_command(normalized: &str) -> bool {
    CURL_COMMAND.is_match(normalized)
}

/// Splits `-XPUT` style tokens into `-X` and `PUT`.
pub fn rewrite(tokens: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(tokens.len());
    for token in tokens {
        match token.strip_prefix("-X") {
            Some(method) => {
                out.push("-X".to_string());
                out.push(method.to_string());
            }
            None => out.push(token),
        }
    }
    out
}

/// Pending value a flag waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurlState {
    #[default]
    None,
    Header,
    UserAgent,
    Data,
    User,
    Method,
    Cookie,
}

/// Request fields accumulated while folding tokens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialRequest {
    pub url: Option<String>,
    pub method: String,
    /// Headers in first-seen order. Setting a header again replaces its value.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl PartialRequest {
    fn new() -> Self {
        Self {
            method: "GET".to_string(),
            ..Default::default()
        }
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn set_header(&mut self, name: &str, value: String) {
        match self.headers.iter_mut().find(|(k, _)| k == name) {
            Some(entry) => entry.1 = value,
            None => self.headers.push((name.to_string(), value)),
        }
    }

    fn has_content_type(&self) -> bool {
        self.headers
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case("content-type"))
    }
}

/// Applies one token to the parse state.
pub fn reduce(
    state: CurlState,
    token: &str,
    mut request: PartialRequest,
) -> (CurlState, PartialRequest) {
    if URL_TOKEN.is_match(token) {
        request.url = Some(token.to_string());
        return (state, request);
    }

    let next = match token {
        "-A" | "--user-agent" => CurlState::UserAgent,
        "-H" | "--header" => CurlState::Header,
        "-d" | "--data" | "--data-ascii" | "--data-raw" | "--data-binary" => CurlState::Data,
        "-u" | "--user" => CurlState::User,
        "-X" | "--request" => CurlState::Method,
        "-b" | "--cookie" => CurlState::Cookie,
        "-I" | "--head" => {
            request.method = "HEAD".to_string();
            state
        }
        "--compressed" => {
            if request.header("Accept-Encoding").is_none() {
                request.set_header("Accept-Encoding", "deflate, gzip".to_string());
            }
            state
        }
        "" => state,
        value => {
            apply_value(state, value, &mut request);
            CurlState::None
        }
    };

    if next != state {
        log::debug!("curl token {:?}: {:?} -> {:?}", token, state, next);
    }
    (next, request)
}

fn apply_value(state: CurlState, value: &str, request: &mut PartialRequest) {
    match state {
        CurlState::None => {}
        CurlState::Header => {
            let (key, field) = parse_field(value);
            request.set_header(key, field.to_string());
        }
        CurlState::UserAgent => request.set_header("User-Agent", value.to_string()),
        CurlState::Data => {
            if request.method == "GET" || request.method == "HEAD" {
                request.method = "POST".to_string();
            }
            if !request.has_content_type() {
                request.set_header("Content-Type", content_type::FORM.to_string());
            }
            if request.body.is_empty() {
                request.body = value.to_string();
            } else {
                request.body = format!("{}&{}", request.body, value);
            }
        }
        CurlState::User => {
            let encoded = general_purpose::STANDARD.encode(value);
            request.set_header("Authorization", format!("Basic {}", encoded));
        }
        CurlState::Method => request.method = value.to_string(),
        CurlState::Cookie => request.set_header("Set-Cookie", value.to_string()),
    }
}

/// Splits `Name: value` at the first colon; one space after it is dropped.
fn parse_field(field: &str) -> (&str, &str) {
    match field.split_once(':') {
        Some((key, value)) => (key, value.strip_prefix(' ').unwrap_or(value)),
        None => (field, ""),
    }
}

/// Parses a curl command into a request.
///
/// The `Content-Type` header is moved into `content_type` (without
/// parameters) and the URL query string into `query`.
///
/// # Errors
///
/// Returns [`ParseError::InvalidCurlText`] if the text is not a curl command,
/// has unbalanced quotes or carries no valid `http(s)` URL.
///
/// # Examples
///
/// ```
/// use cyberapi_core::curl::parse_curl;
/// use cyberapi_core::models::HttpMethod;
///
/// let request = parse_curl("curl -XPUT 'https://example.com/items/1?force=true' -d 'a=1'").unwrap();
/// assert_eq!(request.method, HttpMethod::PUT);
/// assert_eq!(request.uri, "https://example.com/items/1");
/// assert_eq!(request.query[0].key, "force");
/// assert_eq!(request.content_type, "application/x-www-form-urlencoded");
/// ```
pub fn parse_curl(text: &str) -> Result<HttpRequest, ParseError> {
    let normalized = normalize_curl_text(text);
    if !is_curl_command(&normalized) {
        return Err(ParseError::InvalidCurlText);
    }

    let tokens = shlex::split(&normalized).ok_or_else(|| {
        log::warn!("curl text has unbalanced quotes");
        ParseError::InvalidCurlText
    })?;

    let (_, partial) = rewrite(tokens)
        .iter()
        .fold((CurlState::None, PartialRequest::new()), |(state, request), token| {
            reduce(state, token, request)
        });

    into_request(partial)
}

fn into_request(partial: PartialRequest) -> Result<HttpRequest, ParseError> {
    let raw_url = partial.url.ok_or(ParseError::InvalidCurlText)?;
    let url = Url::parse(&raw_url).map_err(|_| ParseError::InvalidCurlText)?;

    let mut content_type = String::new();
    let mut headers = Vec::with_capacity(partial.headers.len());
    for (key, value) in partial.headers {
        if key.eq_ignore_ascii_case("content-type") {
            content_type = value;
        } else {
            headers.push(KvParam::new(key, value));
        }
    }
    if content_type.is_empty() && is_json(&partial.body) {
        content_type = content_type::JSON.to_string();
    }
    if let Some(index) = content_type.find(';') {
        content_type.truncate(index);
    }

    let method_name = partial.method.to_uppercase();
    let method = HttpMethod::from_str(&method_name).unwrap_or_else(|| {
        log::warn!("unsupported curl method {}, using GET", method_name);
        HttpMethod::GET
    });

    let query = url
        .query_pairs()
        .map(|(k, v)| KvParam::new(k.into_owned(), v.into_owned()))
        .collect();

    Ok(HttpRequest {
        method,
        uri: format!("{}{}", url.origin().ascii_serialization(), url.path()),
        body: partial.body,
        content_type,
        headers,
        query,
        auth: Vec::new(),
    })
}
