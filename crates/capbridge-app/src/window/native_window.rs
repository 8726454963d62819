use capbridge_common::{Color, PlatformError};

/// The OS window behind the [`WindowService`](super::WindowService).
///
/// Methods act on the live window; `is_maximized` must never answer from a
/// cache.
pub trait NativeWindow: Send {
    fn show(&mut self) -> Result<(), PlatformError>;

    fn minimize(&mut self) -> Result<(), PlatformError>;

    fn maximize(&mut self) -> Result<(), PlatformError>;

    fn unmaximize(&mut self) -> Result<(), PlatformError>;

    fn is_maximized(&self) -> bool;

    fn close(&mut self) -> Result<(), PlatformError>;

    /// Recolor the caption-button overlay. Only called on Windows.
    fn set_title_bar_overlay(
        &mut self,
        color: Color,
        symbol_color: Color,
        height: u32,
    ) -> Result<(), PlatformError>;

    fn open_devtools(&mut self) {}
}
