//! capbridge configuration.
//!
//! TOML-based configuration with validation and environment overrides.
//! Every section has defaults so partial configs work out of the box.

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{CapbridgeConfig, CONFIG_SCHEMA_VERSION};

use std::path::Path;

use capbridge_common::ConfigError;

/// Environment variable that turns dev mode on (`1`/`true`).
pub const ENV_DEV: &str = "CAPBRIDGE_DEV";
/// Environment variable carrying the live renderer URL.
pub const ENV_RENDERER_URL: &str = "CAPBRIDGE_RENDERER_URL";

/// Load config from `path` if given, otherwise from the platform default
/// location, then apply environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<CapbridgeConfig, ConfigError> {
    let mut config = match path {
        Some(p) => toml_loader::load_from_path(p)?,
        None => toml_loader::load_default()?,
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Apply `CAPBRIDGE_DEV` / `CAPBRIDGE_RENDERER_URL` using `lookup` to read
/// variables.
pub fn apply_env_overrides<F>(config: &mut CapbridgeConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(flag) = lookup(ENV_DEV) {
        config.dev.enabled = matches!(flag.trim(), "1" | "true" | "yes");
    }
    if let Some(url) = lookup(ENV_RENDERER_URL) {
        if !url.trim().is_empty() {
            config.dev.renderer_url = Some(url.trim().to_string());
        }
    }
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &CapbridgeConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
