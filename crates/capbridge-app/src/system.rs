//! Backing service for the `system:*` channels.

use std::sync::{Arc, Mutex, MutexGuard};

use capbridge_common::Platform;
use capbridge_platform::{Desktop, ShortcutManager};
use tracing::info;

pub struct SystemService {
    version: String,
    platform: Platform,
    desktop: Arc<dyn Desktop>,
    shortcuts: Mutex<ShortcutManager>,
}

impl SystemService {
    pub fn new(
        version: impl Into<String>,
        platform: Platform,
        desktop: Arc<dyn Desktop>,
        shortcuts: ShortcutManager,
    ) -> Self {
        Self {
            version: version.into(),
            platform,
            desktop,
            shortcuts: Mutex::new(shortcuts),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn desktop(&self) -> &Arc<dyn Desktop> {
        &self.desktop
    }

    /// `false` on any failure; never an error.
    pub fn register_shortcut(&self, accelerator: &str, id: &str) -> bool {
        self.shortcuts().register(accelerator, id)
    }

    pub fn unregister_shortcut(&self, id: &str) {
        self.shortcuts().unregister(id);
    }

    pub fn shortcut_count(&self) -> usize {
        self.shortcuts().len()
    }

    /// Drop every OS binding. Returns how many were held.
    pub fn release_shortcuts(&self) -> usize {
        let released = self.shortcuts().unregister_all();
        if released > 0 {
            info!(released, "global shortcuts released");
        }
        released
    }

    fn shortcuts(&self) -> MutexGuard<'_, ShortcutManager> {
        self.shortcuts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
