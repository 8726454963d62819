//! Capability bridge and development-mode settings.

use serde::{Deserialize, Serialize};

/// How the capability object reaches the renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Install through the isolated context bridge. When `false` the object
    /// is attached to the renderer's shared global scope, which is a
    /// degraded mode and logged as such at startup.
    pub context_isolation: bool,
    /// Property name the object is exposed under (`window.api`).
    pub global_key: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            context_isolation: true,
            global_key: "api".into(),
        }
    }
}

/// Development-mode switches consumed when the window is constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DevConfig {
    pub enabled: bool,
    /// Live renderer URL (dev server). Ignored unless `enabled`.
    pub renderer_url: Option<String>,
    /// Open the webview inspector once the window is shown.
    pub open_devtools: bool,
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            renderer_url: None,
            open_devtools: true,
        }
    }
}
