//! Per-OS window chrome, chosen once when the window is built.

use capbridge_common::{Color, Platform};
use capbridge_config::schema::WindowConfig;

/// How the native title bar is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleBarStyle {
    /// macOS: content runs under a transparent title bar, title hidden.
    HiddenInset,
    /// Windows: the native caption stays and is tinted with the overlay
    /// colors, here and on every `setTitleBarOverlay`.
    Overlay,
    /// Linux: no native title bar; the renderer draws its own caption.
    Hidden,
}

/// Caption tint applied on Windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayChrome {
    /// Fully transparent keeps the system caption color.
    pub color: Color,
    pub symbol_color: Color,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromeConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub min_width: u32,
    pub min_height: u32,
    pub title_bar: TitleBarStyle,
    pub overlay: Option<OverlayChrome>,
    /// Windows 11 mica behind the caption.
    pub mica: bool,
}

const OVERLAY_SYMBOL_COLOR: Color = Color {
    r: 0x55,
    g: 0x55,
    b: 0x55,
    a: 0xff,
};

const CLEAR: Color = Color {
    r: 0,
    g: 0,
    b: 0,
    a: 0,
};

impl ChromeConfig {
    pub fn for_platform(platform: Platform, window: &WindowConfig) -> Self {
        let base = Self {
            title: window.title.clone(),
            width: window.width,
            height: window.height,
            min_width: window.min_width,
            min_height: window.min_height,
            title_bar: TitleBarStyle::Hidden,
            overlay: None,
            mica: false,
        };

        match platform {
            Platform::Mac => Self {
                title_bar: TitleBarStyle::HiddenInset,
                ..base
            },
            Platform::Windows => Self {
                title_bar: TitleBarStyle::Overlay,
                overlay: Some(OverlayChrome {
                    color: CLEAR,
                    symbol_color: OVERLAY_SYMBOL_COLOR,
                }),
                mica: true,
                ..base
            },
            Platform::Linux => base,
        }
    }

    /// Whether the window is built without native decorations.
    pub fn is_frameless(&self) -> bool {
        self.title_bar == TitleBarStyle::Hidden
    }
}
