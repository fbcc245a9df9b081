//! cURL command generator.
//!
//! Exports an already resolved [`HttpRequest`] as a `curl -v` command line,
//! attaching the client's cookies for the target host.

use super::parser::ParseError;
use crate::models::{content_type, Cookie, HttpRequest, KvParam};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Generates a cURL command for `request`.
///
/// Enabled query params are appended to the uri, cookies whose domain is part
/// of the uri host become a `Cookie` header, and a `Content-Type` header is
/// added from `content_type` when no header carries one. JSON bodies are
/// compacted; form bodies stored as a JSON key/value list become `k=v&...`.
///
/// # Errors
///
/// Returns [`ParseError::InvalidUrl`] if the uri (with its query) does not
/// parse.
///
/// # Examples
///
/// ```
/// use cyberapi_core::curl::generate_curl;
/// use cyberapi_core::models::{HttpMethod, HttpRequest};
///
/// let mut request = HttpRequest::new(HttpMethod::GET, "https://example.com/users");
/// request.add_query("page", "2");
///
/// let curl = generate_curl(&request, &[]).unwrap();
/// assert_eq!(curl, "curl -v -XGET 'https://example.com/users?page=2'");
/// ```
pub fn generate_curl(request: &HttpRequest, cookies: &[Cookie]) -> Result<String, ParseError> {
    let mut uri = request.uri.clone();
    let query = url_values(&request.query);
    if !query.is_empty() {
        uri.push(if uri.contains('?') { '&' } else { '?' });
        uri.push_str(&query.join("&"));
    }

    let url = Url::parse(&uri).map_err(|_| ParseError::InvalidUrl(uri.clone()))?;
    let host = match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    };

    let mut headers = Vec::new();
    let cookie_values: Vec<String> = cookies
        .iter()
        .filter(|cookie| host.contains(&cookie.domain))
        .map(|cookie| format!("{}={}", cookie.name, cookie.value))
        .collect();
    if !cookie_values.is_empty() {
        headers.push(format!("Cookie: {}", cookie_values.join("; ")));
    }

    let mut has_content_type = false;
    for header in request.headers.iter().filter(|h| h.enabled) {
        if header.key.eq_ignore_ascii_case("content-type") {
            has_content_type = true;
        }
        headers.push(format!("{}: {}", header.key, header.value));
    }
    if !has_content_type && !request.content_type.is_empty() {
        headers.push(format!("Content-Type: {}", request.content_type));
    }

    let mut parts = vec![
        "curl".to_string(),
        "-v".to_string(),
        format!("-X{}", request.method.as_str()),
    ];
    if request.has_body() {
        parts.push("-d".to_string());
        parts.push(quote(&convert_body(request)));
    }
    for header in &headers {
        parts.push("-H".to_string());
        parts.push(quote(header));
    }
    parts.push(quote(&uri));

    Ok(parts.join(" "))
}

fn convert_body(request: &HttpRequest) -> String {
    match request.content_type.as_str() {
        content_type::JSON => match serde_json::from_str::<serde_json::Value>(&request.body) {
            Ok(json) => json.to_string(),
            Err(err) => {
                log::warn!("body is not valid JSON, exported as is: {}", err);
                request.body.clone()
            }
        },
        content_type::FORM => match serde_json::from_str::<Vec<KvParam>>(&request.body) {
            Ok(params) => url_values(&params).join("&"),
            Err(_) => request.body.clone(),
        },
        _ => request.body.clone(),
    }
}

/// `key=value` pairs of the enabled params, values percent-encoded.
fn url_values(params: &[KvParam]) -> Vec<String> {
    params
        .iter()
        .filter(|kv| kv.enabled)
        .map(|kv| format!("{}={}", kv.key, encode_uri_component(&kv.value)))
        .collect()
}

/// Percent-encodes everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
fn encode_uri_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Wraps an argument in single quotes, escaping embedded single quotes.
fn quote(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', "'\\''"))
}
