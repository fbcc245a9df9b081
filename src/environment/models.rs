//! Environment and variable data models.
//!
//! A collection owns any number of environments (dev, staging, production...)
//! of which at most one is enabled at a time, and variables that are either
//! bound to one environment or shared by the whole collection.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// An environment of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub id: String,
    pub collection: String,
    #[serde(default)]
    pub name: String,
    /// Whether this is the collection's active environment.
    #[serde(default, with = "status")]
    pub enabled: bool,
}

impl Environment {
    /// Creates a disabled environment with a fresh id.
    pub fn new(collection: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            collection: collection.into(),
            name: name.into(),
            enabled: false,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Category a variable belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableCategory {
    /// Variables scoped to an environment.
    Environment,
    /// Collection-wide user variables.
    Customize,
    /// Headers added to every request of the collection.
    GlobalReqHeaders,
}

impl VariableCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableCategory::Environment => "env",
            VariableCategory::Customize => "customize",
            VariableCategory::GlobalReqHeaders => "globalReqHeaders",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "env" => Some(VariableCategory::Environment),
            "customize" => Some(VariableCategory::Customize),
            "globalReqHeaders" => Some(VariableCategory::GlobalReqHeaders),
            _ => None,
        }
    }
}

impl fmt::Display for VariableCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for VariableCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for VariableCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        VariableCategory::from_str(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown variable category: {}", s)))
    }
}

/// A named value stored in a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub id: String,
    pub category: VariableCategory,
    pub collection: String,
    /// Environment the variable is bound to; `None` for collection-wide values.
    #[serde(default, with = "optional_id")]
    pub environment: Option<String>,
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default = "default_enabled", with = "status")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Variable {
    /// Creates an enabled, collection-wide variable with a fresh id.
    pub fn new(
        collection: impl Into<String>,
        category: VariableCategory,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            category,
            collection: collection.into(),
            environment: None,
            name: name.into(),
            value: value.into(),
            enabled: true,
        }
    }

    /// Binds the variable to an environment.
    pub fn in_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Enabled flags are persisted as "1"/"0" strings; plain booleans are accepted too.
mod status {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "1" } else { "0" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Bool(b) => b,
            Raw::Text(s) => s == "1",
        })
    }
}

/// Environment ids are persisted as possibly-empty strings.
mod optional_id {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<String>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.filter(|s| !s.is_empty()))
    }
}
