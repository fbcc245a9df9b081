//! Configuration management for the template engine.
//!
//! This module provides configuration loading, validation, and access through a singleton pattern.
//! Configuration is read from the app settings under the "cyberapi" key and merged with defaults.

pub mod schema;

pub use schema::{EngineConfig, ScanMode};

use once_cell::sync::Lazy;
use serde_json::Value;
use std::sync::RwLock;

/// Settings key the engine configuration lives under.
pub const SETTINGS_KEY: &str = "cyberapi";

/// Global configuration instance.
static CONFIG: Lazy<RwLock<EngineConfig>> = Lazy::new(|| RwLock::new(EngineConfig::default()));

/// Loads configuration from a settings JSON value.
///
/// Reads the "cyberapi" settings, merges them with defaults, validates the
/// result, and updates the global configuration.
///
/// # Returns
///
/// `Ok(EngineConfig)` with the loaded configuration, or `Err` if validation fails.
///
/// # Example
///
/// ```no_run
/// use cyberapi_core::config::load_config;
/// use serde_json::json;
///
/// let settings = json!({
///     "cyberapi": {
///         "scanMode": "skip",
///         "rollbackOnError": true
///     }
/// });
///
/// let config = load_config(Some(settings)).unwrap();
/// assert!(config.rollback_on_error);
/// ```
pub fn load_config(settings_json: Option<Value>) -> Result<EngineConfig, String> {
    let mut config = EngineConfig::default();

    if let Some(settings) = settings_json {
        if let Some(engine_settings) = settings.get(SETTINGS_KEY) {
            match serde_json::from_value::<EngineConfig>(engine_settings.clone()) {
                Ok(user_config) => {
                    config = config.merge(&user_config);
                }
                Err(e) => {
                    log::warn!(
                        "failed to parse {} settings: {}, using defaults",
                        SETTINGS_KEY,
                        e
                    );
                }
            }
        }
    }

    config
        .validate()
        .map_err(|e| format!("Invalid configuration: {}", e))?;

    if let Ok(mut global_config) = CONFIG.write() {
        *global_config = config.clone();
    }

    Ok(config)
}

/// Gets a clone of the current global configuration.
///
/// Returns the defaults if no configuration has been loaded yet.
pub fn get_config() -> EngineConfig {
    CONFIG
        .read()
        .map(|c| c.clone())
        .unwrap_or_else(|_| EngineConfig::default())
}

/// Updates the global configuration in place.
///
/// If the update leaves the configuration invalid it is reverted to defaults.
pub fn update_config<F>(updater: F)
where
    F: FnOnce(&mut EngineConfig),
{
    if let Ok(mut config) = CONFIG.write() {
        updater(&mut config);

        if let Err(e) = config.validate() {
            log::warn!("configuration invalid after update: {}", e);
            *config = EngineConfig::default();
        }
    }
}

/// Resets the configuration to defaults.
pub fn reset_config() {
    if let Ok(mut config) = CONFIG.write() {
        *config = EngineConfig::default();
    }
}
