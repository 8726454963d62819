//! Configuration schema types for capbridge.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod bridge;
mod system;
mod window;

pub use bridge::*;
pub use system::*;
pub use window::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct CapbridgeConfig {
    pub app: AppConfig,
    pub window: WindowConfig,
    pub bridge: BridgeConfig,
    pub dev: DevConfig,
    pub storage: StorageConfig,
    pub shortcuts: ShortcutsConfig,
    pub logging: LoggingConfig,
}

impl CapbridgeConfig {
    /// The dev server URL, if dev mode is on and one is configured.
    pub fn dev_renderer_url(&self) -> Option<&str> {
        if self.dev.enabled {
            self.dev.renderer_url.as_deref()
        } else {
            None
        }
    }
}
