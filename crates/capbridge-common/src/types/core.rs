use std::fmt;

use serde::{Deserialize, Serialize};

use super::color::Color;

/// Host operating system family.
///
/// Serialized with the identifiers renderers already branch on
/// (`darwin`, `win32`, `linux`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "darwin")]
    Mac,
    #[serde(rename = "win32")]
    Windows,
    #[serde(rename = "linux")]
    Linux,
}

impl Platform {
    /// The platform this binary was compiled for. Anything that is neither
    /// macOS nor Windows is treated as Linux.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::Mac
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::Linux
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mac => "darwin",
            Self::Windows => "win32",
            Self::Linux => "linux",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the top-level window as seen by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowState {
    pub maximized: bool,
    pub platform: Platform,
}

/// Colors of the native caption-button overlay (Windows only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleBarOverlay {
    pub color: String,
    pub symbol_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl TitleBarOverlay {
    /// Parse both colors; `None` if either is not a hex color.
    pub fn colors(&self) -> Option<(Color, Color)> {
        Some((
            Color::from_hex(&self.color)?,
            Color::from_hex(&self.symbol_color)?,
        ))
    }
}
