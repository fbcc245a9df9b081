//! Accumulator passed between the steps of a function chain.

use super::scanner::Argument;
use serde_json::Value as JsonValue;
use std::fmt;

/// Intermediate value of a chain evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    List(Vec<String>),
    Bytes(Vec<u8>),
    Json(JsonValue),
    Null,
}

impl Value {
    /// Generic string form.
    ///
    /// Lists are joined with `,`, bytes are decoded lossily, JSON strings are
    /// unquoted and other JSON values are serialized compactly.
    pub fn stringify(&self) -> String {
        match self {
            Value::Text(text) => text.clone(),
            Value::List(items) => items.join(","),
            Value::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Value::Json(JsonValue::String(s)) => s.clone(),
            Value::Json(JsonValue::Null) => String::new(),
            Value::Json(json) => json.to_string(),
            Value::Null => String::new(),
        }
    }

    /// Raw bytes of the value; non-byte values use their UTF-8 string form.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Value::Bytes(bytes) => bytes.clone(),
            other => other.stringify().into_bytes(),
        }
    }

    /// The value viewed as an argument list. A single value is a one-element list.
    pub fn to_list(&self) -> Vec<String> {
        match self {
            Value::List(items) => items.clone(),
            other => vec![other.stringify()],
        }
    }
}

impl From<Argument> for Value {
    fn from(argument: Argument) -> Self {
        match argument {
            Argument::Single(s) => Value::Text(s),
            Argument::List(items) => Value::List(items),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stringify())
    }
}
