//! Window geometry settings.

use serde::{Deserialize, Serialize};

/// Initial geometry and limits of the single top-level window.
///
/// Chrome styling (title bar, vibrancy, overlay) is not configurable here;
/// it is derived from the host platform when the window is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub min_width: u32,
    pub min_height: u32,
    /// Height of the caption-button overlay on Windows, in logical pixels.
    /// Should match the renderer's own title bar height.
    pub titlebar_height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "capbridge".into(),
            width: 1200,
            height: 800,
            min_width: 900,
            min_height: 600,
            titlebar_height: 48,
        }
    }
}
