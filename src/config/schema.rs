//! Configuration schema for the template engine.
//!
//! This module defines the configuration structure and validation logic for
//! the user-tunable behaviour of placeholder scanning and evaluation.

use crate::host::BaseDirectory;
use serde::{Deserialize, Serialize};

/// Main configuration structure for the template engine.
///
/// All settings can be supplied under the "cyberapi" key of the app settings.
/// Missing settings fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Directory `readFile`/`readTextFile` read from when the placeholder
    /// names none. Defaults to the download directory.
    #[serde(default)]
    pub default_base_dir: BaseDirectory,

    /// Length of the string produced by `random()` for unknown types.
    ///
    /// Must be greater than 0. Defaults to 10.
    #[serde(default = "default_random_string_length")]
    pub random_string_length: usize,

    /// Length of the random part of generated e-mail addresses.
    ///
    /// Must be greater than 0. Defaults to 8.
    #[serde(default = "default_random_local_part_length")]
    pub random_local_part_length: usize,

    /// Domain used by `random(email)` when no domain is given.
    #[serde(default = "default_email_domain")]
    pub default_email_domain: String,

    /// What the scanner does when it meets a malformed placeholder.
    #[serde(default)]
    pub scan_mode: ScanMode,

    /// Whether a failed resolution discards the partially substituted text.
    ///
    /// When false the error carries the text as it was when evaluation failed.
    #[serde(default)]
    pub rollback_on_error: bool,

    /// Whether `//` comment lines are dropped from JSON bodies before
    /// substitution. Defaults to true.
    #[serde(default = "default_strip_json_comments")]
    pub strip_json_comments: bool,

    /// Number of request ids the latest-response store remembers.
    ///
    /// Must be greater than 0. Defaults to 100.
    #[serde(default = "default_latest_response_limit")]
    pub latest_response_limit: usize,
}

/// Scanner behaviour on malformed placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Stop at the first malformed placeholder and keep what was found before it.
    #[default]
    Stop,
    /// Skip malformed placeholders and keep scanning.
    Skip,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_base_dir: BaseDirectory::default(),
            random_string_length: default_random_string_length(),
            random_local_part_length: default_random_local_part_length(),
            default_email_domain: default_email_domain(),
            scan_mode: ScanMode::default(),
            rollback_on_error: false,
            strip_json_comments: default_strip_json_comments(),
            latest_response_limit: default_latest_response_limit(),
        }
    }
}

impl EngineConfig {
    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// `Ok(())` if all settings are valid, or `Err` naming the first invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        if self.random_string_length == 0 {
            return Err("randomStringLength must be greater than 0".to_string());
        }

        if self.random_local_part_length == 0 {
            return Err("randomLocalPartLength must be greater than 0".to_string());
        }

        if self.default_email_domain.trim().is_empty() {
            return Err("defaultEmailDomain must not be empty".to_string());
        }

        if self.latest_response_limit == 0 {
            return Err("latestResponseLimit must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Merges this configuration with another, using values from `other`.
    pub fn merge(&self, other: &EngineConfig) -> Self {
        Self {
            default_base_dir: other.default_base_dir,
            random_string_length: other.random_string_length,
            random_local_part_length: other.random_local_part_length,
            default_email_domain: other.default_email_domain.clone(),
            scan_mode: other.scan_mode,
            rollback_on_error: other.rollback_on_error,
            strip_json_comments: other.strip_json_comments,
            latest_response_limit: other.latest_response_limit,
        }
    }
}

// Default value functions for serde

fn default_random_string_length() -> usize {
    10
}

fn default_random_local_part_length() -> usize {
    8
}

fn default_email_domain() -> String {
    "example.com".to_string()
}

fn default_strip_json_comments() -> bool {
    true
}

fn default_latest_response_limit() -> usize {
    100
}
