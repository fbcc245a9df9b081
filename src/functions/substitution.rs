//! Text-level substitution of template functions.
//!
//! Every placeholder found in a text is evaluated in order of appearance and
//! its span in the original text is replaced by the result. Results are
//! spliced in verbatim, so a value that itself looks like `{{...}}` is never
//! expanded or overwritten by a later placeholder.

use super::error::ResolveError;
use super::evaluator::Evaluator;
use super::scanner::scan;
use crate::models::{is_json, HttpRequest, KvParam};

/// Resolves every template function in `text`.
///
/// # Errors
///
/// The first failing evaluation aborts the resolution. Unless the evaluator's
/// configuration asks for a rollback, the error carries the text with the
/// placeholders before the failing one already substituted.
///
/// # Examples
///
/// ```no_run
/// # use std::sync::Arc;
/// # use cyberapi_core::environment::InMemoryStore;
/// # use cyberapi_core::functions::{replace_functions, Evaluator};
/// # use cyberapi_core::history::LatestResponses;
/// # async fn demo() {
/// let evaluator = Evaluator::new(
///     Arc::new(InMemoryStore::new()),
///     Arc::new(LatestResponses::new(10)),
/// );
/// let text = replace_functions("sign={{md5(abc)}}", "c1", &evaluator).await.unwrap();
/// assert_eq!(text, "sign=900150983cd24fb0d6963f7d28e17f72");
/// # }
/// ```
pub async fn replace_functions(
    text: &str,
    collection: &str,
    evaluator: &Evaluator,
) -> Result<String, ResolveError> {
    let config = evaluator.config();
    let scanned = scan(text, collection, config.scan_mode);
    if scanned.matches.is_empty() {
        return Ok(text.to_string());
    }

    let mut result = String::with_capacity(text.len());
    let mut cursor = 0;
    for placeholder in &scanned.matches {
        match evaluator.evaluate(placeholder).await {
            Ok(value) => {
                result.push_str(&text[cursor..placeholder.start]);
                result.push_str(&value);
                cursor = placeholder.end;
            }
            Err(error) => {
                log::warn!("failed to resolve {}: {}", placeholder.text, error);
                let partial = if config.rollback_on_error {
                    None
                } else {
                    result.push_str(&text[cursor..]);
                    Some(result)
                };
                return Err(ResolveError { error, partial });
            }
        }
    }
    result.push_str(&text[cursor..]);

    Ok(result)
}

/// Resolves the value of every key/value param in place.
pub async fn convert_kv_params(
    collection: &str,
    params: &mut [KvParam],
    evaluator: &Evaluator,
) -> Result<(), ResolveError> {
    for param in params.iter_mut() {
        param.value = replace_functions(&param.value, collection, evaluator).await?;
    }
    Ok(())
}

/// Resolves a request body.
///
/// Bodies that look like JSON once trimmed first lose their `//` comment
/// lines, unless the evaluator's configuration disables comment stripping.
pub async fn convert_body(
    collection: &str,
    body: &str,
    evaluator: &Evaluator,
) -> Result<String, ResolveError> {
    if evaluator.config().strip_json_comments && is_json(body.trim()) {
        let stripped = strip_comment_lines(body);
        return replace_functions(&stripped, collection, evaluator).await;
    }
    replace_functions(body, collection, evaluator).await
}

fn strip_comment_lines(body: &str) -> String {
    body.lines()
        .filter(|line| !line.trim_start().starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Returns a copy of `request` with the uri, body, query values and header
/// values resolved.
pub async fn resolve_request(
    collection: &str,
    request: &HttpRequest,
    evaluator: &Evaluator,
) -> Result<HttpRequest, ResolveError> {
    let mut resolved = request.clone();
    resolved.uri = replace_functions(&request.uri, collection, evaluator).await?;
    resolved.body = convert_body(collection, &request.body, evaluator).await?;
    convert_kv_params(collection, &mut resolved.query, evaluator).await?;
    convert_kv_params(collection, &mut resolved.headers, evaluator).await?;
    Ok(resolved)
}
