use std::sync::{Arc, Mutex, MutexGuard};

use capbridge_common::{Color, PlatformError};

use super::native_window::NativeWindow;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HeadlessState {
    pub visible: bool,
    pub minimized: bool,
    pub maximized: bool,
    pub closed: bool,
    pub devtools_open: bool,
    pub overlay: Option<(Color, Color, u32)>,
}

/// Window with no pixels, used by `--stdio` mode and tests.
///
/// Clones share state, so a test can keep one handle to inspect the window
/// or simulate the user resizing it.
#[derive(Debug, Clone, Default)]
pub struct HeadlessWindow {
    state: Arc<Mutex<HeadlessState>>,
}

impl HeadlessWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> HeadlessState {
        self.state.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Change the maximized flag as the OS would when the user
    /// double-clicks the title bar.
    pub fn set_maximized_externally(&self, maximized: bool) {
        if let Ok(mut s) = self.state.lock() {
            s.maximized = maximized;
        }
    }

    fn live(&self) -> Result<MutexGuard<'_, HeadlessState>, PlatformError> {
        let state = self
            .state
            .lock()
            .map_err(|_| PlatformError::WindowError("window state poisoned".into()))?;
        if state.closed {
            return Err(PlatformError::WindowError("window is closed".into()));
        }
        Ok(state)
    }
}

impl NativeWindow for HeadlessWindow {
    fn show(&mut self) -> Result<(), PlatformError> {
        self.live()?.visible = true;
        Ok(())
    }

    fn minimize(&mut self) -> Result<(), PlatformError> {
        self.live()?.minimized = true;
        Ok(())
    }

    fn maximize(&mut self) -> Result<(), PlatformError> {
        let mut s = self.live()?;
        s.maximized = true;
        s.minimized = false;
        Ok(())
    }

    fn unmaximize(&mut self) -> Result<(), PlatformError> {
        self.live()?.maximized = false;
        Ok(())
    }

    fn is_maximized(&self) -> bool {
        self.state
            .lock()
            .map(|s| !s.closed && s.maximized)
            .unwrap_or(false)
    }

    fn close(&mut self) -> Result<(), PlatformError> {
        let mut s = self.live()?;
        s.closed = true;
        s.visible = false;
        Ok(())
    }

    fn set_title_bar_overlay(
        &mut self,
        color: Color,
        symbol_color: Color,
        height: u32,
    ) -> Result<(), PlatformError> {
        self.live()?.overlay = Some((color, symbol_color, height));
        Ok(())
    }

    fn open_devtools(&mut self) {
        if let Ok(mut s) = self.state.lock() {
            s.devtools_open = true;
        }
    }
}
