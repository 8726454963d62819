use std::sync::Arc;

use capbridge_common::{Color, PlatformError};
use winit::event_loop::EventLoopProxy;
use winit::window::Window;

use super::UserEvent;
use crate::window::NativeWindow;

/// The winit window as seen from channel handlers.
///
/// Geometry calls go straight to winit, which forwards them to the main
/// thread itself. Anything touching the webview is posted to the event loop.
pub struct WinitWindow {
    window: Arc<Window>,
    proxy: EventLoopProxy<UserEvent>,
}

impl WinitWindow {
    pub fn new(window: Arc<Window>, proxy: EventLoopProxy<UserEvent>) -> Self {
        Self { window, proxy }
    }

    fn post(&self, event: UserEvent) -> Result<(), PlatformError> {
        self.proxy
            .send_event(event)
            .map_err(|_| PlatformError::WindowError("event loop closed".into()))
    }
}

impl NativeWindow for WinitWindow {
    fn show(&mut self) -> Result<(), PlatformError> {
        self.window.set_visible(true);
        self.window.focus_window();
        Ok(())
    }

    fn minimize(&mut self) -> Result<(), PlatformError> {
        self.window.set_minimized(true);
        Ok(())
    }

    fn maximize(&mut self) -> Result<(), PlatformError> {
        self.window.set_maximized(true);
        Ok(())
    }

    fn unmaximize(&mut self) -> Result<(), PlatformError> {
        self.window.set_maximized(false);
        Ok(())
    }

    fn is_maximized(&self) -> bool {
        self.window.is_maximized()
    }

    fn close(&mut self) -> Result<(), PlatformError> {
        self.post(UserEvent::Close)
    }

    #[cfg(target_os = "windows")]
    fn set_title_bar_overlay(
        &mut self,
        color: Color,
        symbol_color: Color,
        _height: u32,
    ) -> Result<(), PlatformError> {
        use winit::platform::windows::{Color as CaptionColor, WindowExtWindows};

        let background = (!color.is_transparent())
            .then(|| CaptionColor::from_rgb(color.r, color.g, color.b));
        self.window.set_title_background_color(background);
        self.window.set_title_text_color(CaptionColor::from_rgb(
            symbol_color.r,
            symbol_color.g,
            symbol_color.b,
        ));
        Ok(())
    }

    #[cfg(not(target_os = "windows"))]
    fn set_title_bar_overlay(
        &mut self,
        _color: Color,
        _symbol_color: Color,
        _height: u32,
    ) -> Result<(), PlatformError> {
        Err(PlatformError::NotSupported("title bar overlay".into()))
    }

    fn open_devtools(&mut self) {
        let _ = self.post(UserEvent::OpenDevtools);
    }
}
