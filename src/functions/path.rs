//! Dot-path lookup into JSON documents.
//!
//! Supports `a.b.c`, numeric segments for arrays (`items.0.id`) and bracket
//! indices (`items[0].id`).

use serde_json::Value;

/// Returns the value at `path`, or `None` if any segment is missing.
pub fn get_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let segments = split_path(path);
    if segments.is_empty() {
        return None;
    }

    segments.iter().try_fold(root, |current, segment| match current {
        Value::Object(map) => map.get(segment.as_str()),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn split_path(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    for part in path.split('.') {
        let mut rest = part.trim();
        if let Some(open) = rest.find('[') {
            if open > 0 {
                segments.push(rest[..open].to_string());
            }
            rest = &rest[open..];
            while let Some(stripped) = rest.strip_prefix('[') {
                let Some(close) = stripped.find(']') else {
                    segments.push(stripped.to_string());
                    break;
                };
                segments.push(stripped[..close].trim_matches(|c| c == '\'' || c == '"').to_string());
                rest = &stripped[close + 1..];
            }
        } else if !rest.is_empty() {
            segments.push(rest.to_string());
        }
    }
    segments
}
