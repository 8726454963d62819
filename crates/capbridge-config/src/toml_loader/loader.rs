use std::path::{Path, PathBuf};

use capbridge_common::ConfigError;
use tracing::{info, warn};

use crate::schema::CapbridgeConfig;
use crate::validation;

const APP_DIR: &str = "capbridge";
const CONFIG_FILE: &str = "capbridge.toml";

/// Load config from a specific TOML file path.
///
/// Missing fields use serde defaults. If the parsed config fails
/// validation, a warning is logged and the default config is returned.
pub fn load_from_path(path: &Path) -> Result<CapbridgeConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::ParseError(format!("failed to read {}: {e}", path.display()))
    })?;

    let config: CapbridgeConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    if let Err(e) = validation::validate(&config) {
        warn!("config validation warning: {e}");
        warn!("falling back to default config");
        return Ok(CapbridgeConfig::default());
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path, creating a
/// commented default file first if none exists.
pub fn load_default() -> Result<CapbridgeConfig, ConfigError> {
    let path = default_config_path()?;

    if !path.exists() {
        info!("no config found at {}, creating default", path.display());
        create_default_config(&path)?;
        return Ok(CapbridgeConfig::default());
    }

    load_from_path(&path)
}

/// Get the platform-specific default config file path.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))?;
    Ok(config_dir.join(APP_DIR).join(CONFIG_FILE))
}

/// Create a default TOML config file with documentation comments.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::ParseError(format!(
                "failed to create config directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    std::fs::write(path, DEFAULT_CONFIG_TOML).map_err(|e| {
        ConfigError::ParseError(format!(
            "failed to write default config to {}: {e}",
            path.display()
        ))
    })?;

    info!("created default config at {}", path.display());
    Ok(())
}

const DEFAULT_CONFIG_TOML: &str = r#"# capbridge configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[app]
# name = "capbridge"
# version = "0.1.0"       # reported by system:getVersion

[window]
# title = "capbridge"
# width = 1200
# height = 800
# min_width = 900
# min_height = 600
# titlebar_height = 48    # default height for title bar overlay updates

[bridge]
# context_isolation = true   # false attaches window.api to the shared global scope
# global_key = "api"

[dev]
# enabled = false            # also CAPBRIDGE_DEV=1 or --dev
# renderer_url = "http://localhost:5173"   # also CAPBRIDGE_RENDERER_URL
# open_devtools = true

[storage]
# file_name = "app-storage.json"

[shortcuts]
# release_on_shutdown = true

[logging]
# level = "info"             # trace, debug, info, warn, error
# file_logging = true
"#;
