use std::sync::{Arc, Mutex, MutexGuard};

use capbridge_common::{
    EventBus, HostEvent, Platform, PlatformError, TitleBarOverlay, WindowState,
};
use tracing::{debug, info};

use super::native_window::NativeWindow;

/// Lifecycle of the top-level window.
///
/// `Hidden` until the first paint, then `Shown` and afterwards `Maximized` or
/// `Normal` as the user resizes. `Destroyed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPhase {
    Hidden,
    Shown,
    Maximized,
    Normal,
    Destroyed,
}

struct Inner {
    window: Box<dyn NativeWindow>,
    phase: WindowPhase,
    /// Last maximized value announced on the bus.
    announced: bool,
}

/// Owns the single top-level window.
///
/// Every change of the maximized flag, whether caused by a channel call or
/// by the user, is published once as [`HostEvent::MaximizeChanged`] in the
/// order it happened.
pub struct WindowService {
    inner: Mutex<Inner>,
    events: Arc<EventBus>,
    platform: Platform,
    open_devtools: bool,
    overlay_height: u32,
}

impl WindowService {
    pub fn new(window: Box<dyn NativeWindow>, events: Arc<EventBus>, platform: Platform) -> Self {
        Self {
            inner: Mutex::new(Inner {
                window,
                phase: WindowPhase::Hidden,
                announced: false,
            }),
            events,
            platform,
            open_devtools: false,
            overlay_height: 48,
        }
    }

    /// Open dev tools when the window is first shown.
    pub fn with_devtools(mut self, open: bool) -> Self {
        self.open_devtools = open;
        self
    }

    /// Overlay height used when a renderer update leaves it out.
    pub fn with_overlay_height(mut self, height: u32) -> Self {
        self.overlay_height = height;
        self
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn phase(&self) -> WindowPhase {
        self.lock()
            .map(|inner| inner.phase)
            .unwrap_or(WindowPhase::Destroyed)
    }

    pub fn state(&self) -> WindowState {
        WindowState {
            maximized: self.is_maximized(),
            platform: self.platform,
        }
    }

    /// First paint is ready: show the window. Later calls do nothing.
    pub fn ready_to_show(&self) -> Result<(), PlatformError> {
        let mut inner = self.lock()?;
        if inner.phase != WindowPhase::Hidden {
            return Ok(());
        }
        inner.window.show()?;
        inner.phase = WindowPhase::Shown;
        if self.open_devtools {
            inner.window.open_devtools();
        }
        drop(inner);

        info!("window shown");
        self.events.publish(HostEvent::WindowShown);
        Ok(())
    }

    pub fn minimize(&self) -> Result<(), PlatformError> {
        let mut inner = self.live()?;
        inner.window.minimize()
    }

    /// Maximize a normal window, restore a maximized one.
    pub fn toggle_maximize(&self) -> Result<(), PlatformError> {
        {
            let mut inner = self.live()?;
            if inner.window.is_maximized() {
                inner.window.unmaximize()?;
            } else {
                inner.window.maximize()?;
            }
        }
        self.sync_maximized();
        Ok(())
    }

    /// Re-read the live maximized flag and announce it if it changed.
    /// Called after every resize the window reports.
    pub fn sync_maximized(&self) -> bool {
        let Ok(mut inner) = self.live() else {
            return false;
        };
        let maximized = inner.window.is_maximized();
        if maximized == inner.announced {
            return maximized;
        }
        inner.announced = maximized;
        inner.phase = if maximized {
            WindowPhase::Maximized
        } else {
            WindowPhase::Normal
        };
        // Publish while holding the lock so concurrent toggles cannot reorder.
        self.events.publish(HostEvent::MaximizeChanged(maximized));
        debug!(maximized, "maximize state changed");
        maximized
    }

    /// Live answer from the window; `false` once it is gone.
    pub fn is_maximized(&self) -> bool {
        match self.lock() {
            Ok(inner) if inner.phase != WindowPhase::Destroyed => inner.window.is_maximized(),
            _ => false,
        }
    }

    pub fn close(&self) -> Result<(), PlatformError> {
        let mut inner = self.lock()?;
        if inner.phase == WindowPhase::Destroyed {
            return Ok(());
        }
        inner.window.close()?;
        inner.phase = WindowPhase::Destroyed;
        drop(inner);

        info!("window closed");
        self.events.publish(HostEvent::WindowDestroyed);
        Ok(())
    }

    /// Recolor the caption buttons. Applied on Windows; acknowledged and
    /// ignored elsewhere. Returns whether it was applied.
    pub fn set_title_bar_overlay(&self, overlay: &TitleBarOverlay) -> Result<bool, PlatformError> {
        if self.platform != Platform::Windows {
            debug!(platform = %self.platform, "title bar overlay ignored");
            return Ok(false);
        }
        let (color, symbol_color) = overlay.colors().ok_or_else(|| {
            PlatformError::WindowError(format!(
                "invalid overlay colors: {} / {}",
                overlay.color, overlay.symbol_color
            ))
        })?;
        let height = overlay.height.unwrap_or(self.overlay_height);

        let mut inner = self.live()?;
        inner.window.set_title_bar_overlay(color, symbol_color, height)?;
        Ok(true)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, PlatformError> {
        self.inner
            .lock()
            .map_err(|_| PlatformError::WindowError("window service poisoned".into()))
    }

    fn live(&self) -> Result<MutexGuard<'_, Inner>, PlatformError> {
        let inner = self.lock()?;
        if inner.phase == WindowPhase::Destroyed {
            return Err(PlatformError::WindowError("window is destroyed".into()));
        }
        Ok(inner)
    }
}
