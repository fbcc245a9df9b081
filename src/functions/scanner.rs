//! Placeholder scanner.
//!
//! Finds `{{fn1.fn2(arg, ...)}}` placeholders in request text. Each
//! placeholder must carry exactly one parenthesized argument group; the text
//! before it, split on `.`, is the function chain.

use crate::config::ScanMode;
use once_cell::sync::Lazy;
use regex::Regex;

/// Matches `{{...}}` non-greedily, across newlines.
static PLACEHOLDER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{\{(.+?)\}\}").expect("Failed to compile placeholder regex"));

/// Matches one `(...)` argument group non-greedily.
static ARGUMENT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\((.*?)\)").expect("Failed to compile argument regex"));

/// Argument of a placeholder: one string, or several when commas are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    Single(String),
    List(Vec<String>),
}

impl Argument {
    /// Splits raw argument text on commas, trimming whitespace and one layer
    /// of matching quotes from every piece.
    pub fn parse(raw: &str) -> Self {
        let mut items: Vec<String> = raw.split(',').map(trim_param).collect();
        if items.len() < 2 {
            Argument::Single(items.pop().unwrap_or_default())
        } else {
            Argument::List(items)
        }
    }
}

fn trim_param(item: &str) -> String {
    let item = item.trim();
    for quote in ['\'', '"'] {
        if item.len() >= 2 && item.starts_with(quote) && item.ends_with(quote) {
            return item[1..item.len() - 1].to_string();
        }
    }
    item.to_string()
}

/// One placeholder occurrence found in a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderMatch {
    /// Collection the text belongs to; scopes variable lookups.
    pub collection: String,

    /// The exact matched text including the braces.
    pub text: String,

    /// Byte offset of the match in the scanned text.
    pub start: usize,

    /// Byte offset just past the match.
    pub end: usize,

    /// Function names in textual order. They are applied last to first.
    pub function_chain: Vec<String>,

    pub argument: Argument,
}

/// Outcome of a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scan {
    /// Well-formed placeholders in order of appearance.
    pub matches: Vec<PlaceholderMatch>,

    /// Malformed placeholders encountered. In [`ScanMode::Stop`] this holds at
    /// most the one placeholder scanning stopped at.
    pub malformed: Vec<String>,
}

/// Scans `text` for placeholders, stopping at the first malformed one.
///
/// Placeholders found before the malformed one are returned; everything
/// after it is ignored.
///
/// # Examples
///
/// ```
/// use cyberapi_core::functions::{scan_placeholders, Argument};
///
/// let matches = scan_placeholders("Bearer {{env.trim(token)}}", "c1");
/// assert_eq!(matches.len(), 1);
/// assert_eq!(matches[0].text, "{{env.trim(token)}}");
/// assert_eq!(matches[0].function_chain, vec!["env", "trim"]);
/// assert_eq!(matches[0].argument, Argument::Single("token".to_string()));
/// ```
pub fn scan_placeholders(text: &str, collection: &str) -> Vec<PlaceholderMatch> {
    scan(text, collection, ScanMode::Stop).matches
}

/// Scans `text` for placeholders using the given malformed-placeholder policy.
pub fn scan(text: &str, collection: &str, mode: ScanMode) -> Scan {
    let mut result = Scan::default();
    if !text.contains("{{") {
        return result;
    }

    for cap in PLACEHOLDER_REGEX.captures_iter(text) {
        let (Some(full), Some(inner)) = (cap.get(0), cap.get(1)) else {
            continue;
        };

        match parse_placeholder(inner.as_str()) {
            Some((function_chain, argument)) => {
                log::debug!("found placeholder {}", full.as_str());
                result.matches.push(PlaceholderMatch {
                    collection: collection.to_string(),
                    text: full.as_str().to_string(),
                    start: full.start(),
                    end: full.end(),
                    function_chain,
                    argument,
                });
            }
            None => {
                result.malformed.push(full.as_str().to_string());
                match mode {
                    ScanMode::Stop => {
                        log::warn!("malformed placeholder {}, scanning stopped", full.as_str());
                        break;
                    }
                    ScanMode::Skip => {
                        log::warn!("malformed placeholder {}, skipped", full.as_str());
                    }
                }
            }
        }
    }

    result
}

/// Splits a placeholder body into its function chain and argument.
///
/// Returns `None` unless exactly one `(...)` group is present.
fn parse_placeholder(inner: &str) -> Option<(Vec<String>, Argument)> {
    let mut groups = ARGUMENT_REGEX.captures_iter(inner);
    let group = groups.next()?;
    if groups.next().is_some() {
        return None;
    }

    let whole = group.get(0)?;
    let args = group.get(1)?;

    let mut name = String::with_capacity(inner.len());
    name.push_str(&inner[..whole.start()]);
    name.push_str(&inner[whole.end()..]);

    let chain = name.split('.').map(|s| s.trim().to_string()).collect();
    Some((chain, Argument::parse(args.as_str())))
}
