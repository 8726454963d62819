//! Explicit host state built once at startup.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use capbridge_common::{CapbridgeError, EventBus, HostEvent, Platform};
use capbridge_config::CapbridgeConfig;
use capbridge_ipc::{CapabilityBridge, ChannelRegistry, RegistryError};
use capbridge_platform::{
    paths, Desktop, HotkeyBackend, NativeDesktop, ProcessHotkeys, ShortcutManager,
};
use tracing::{info, warn};

use crate::modules;
use crate::storage::PersistedStore;
use crate::system::SystemService;
use crate::window::{HeadlessWindow, NativeWindow, WindowService};

/// OS-facing pieces a [`HostContext`] is assembled from.
pub struct HostServices {
    pub window: Box<dyn NativeWindow>,
    pub hotkeys: Box<dyn HotkeyBackend>,
    pub desktop: Arc<dyn Desktop>,
    pub storage_path: PathBuf,
}

impl HostServices {
    /// Real desktop and storage with no window and process-local hotkeys.
    pub fn headless(config: &CapbridgeConfig) -> Result<Self, CapbridgeError> {
        Ok(Self {
            window: Box::new(HeadlessWindow::new()),
            hotkeys: Box::new(ProcessHotkeys::new()),
            desktop: Arc::new(NativeDesktop::new()),
            storage_path: paths::storage_file(&config.storage.file_name)?,
        })
    }
}

/// Everything the channel handlers operate on.
///
/// Contexts are independent of each other, so tests can run several side
/// by side.
pub struct HostContext {
    config: CapbridgeConfig,
    platform: Platform,
    events: Arc<EventBus>,
    window: Arc<WindowService>,
    storage: Arc<PersistedStore>,
    system: Arc<SystemService>,
    shut_down: AtomicBool,
}

impl HostContext {
    pub fn new(config: CapbridgeConfig, services: HostServices) -> Self {
        Self::with_platform(config, services, Platform::current())
    }

    /// Context that behaves as if running on `platform`.
    pub fn with_platform(
        config: CapbridgeConfig,
        services: HostServices,
        platform: Platform,
    ) -> Self {
        let events = Arc::new(EventBus::new());

        let window = WindowService::new(services.window, events.clone(), platform)
            .with_devtools(config.dev.enabled && config.dev.open_devtools)
            .with_overlay_height(config.window.titlebar_height);

        let storage = PersistedStore::open(services.storage_path);

        let shortcuts = ShortcutManager::with_platform(services.hotkeys, events.clone(), platform);
        let system = SystemService::new(
            config.app.version.clone(),
            platform,
            services.desktop,
            shortcuts,
        );

        Self {
            config,
            platform,
            events,
            window: Arc::new(window),
            storage: Arc::new(storage),
            system: Arc::new(system),
            shut_down: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &CapbridgeConfig {
        &self.config
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    pub fn window(&self) -> &Arc<WindowService> {
        &self.window
    }

    pub fn storage(&self) -> &Arc<PersistedStore> {
        &self.storage
    }

    pub fn system(&self) -> &Arc<SystemService> {
        &self.system
    }

    /// A registry with every catalogue channel bound to this context.
    pub fn build_registry(&self) -> Result<ChannelRegistry, RegistryError> {
        let mut registry = ChannelRegistry::new();
        modules::register_all(&mut registry, self)?;

        let missing = registry.missing();
        if !missing.is_empty() {
            warn!(?missing, "channels without a handler");
        }
        Ok(registry)
    }

    pub fn bridge(&self) -> CapabilityBridge {
        CapabilityBridge::from_config(&self.config.bridge)
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }

    /// Release OS resources. Safe to call more than once.
    pub fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return;
        }
        info!("shutting down host");

        if self.config.shortcuts.release_on_shutdown {
            self.system.release_shortcuts();
        }
        if self.storage.is_diverged() {
            if let Err(e) = self.storage.flush() {
                warn!(error = %e, "store could not be written before exit");
            }
        }
        self.events.publish(HostEvent::Shutdown);
    }
}
