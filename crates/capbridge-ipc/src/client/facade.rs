use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use capbridge_common::{Platform, WindowState};
use tracing::debug;

use super::api::CapabilityApi;
use crate::protocol::RemoteError;

type ShortcutHandler = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Default)]
struct WindowCache {
    maximized: bool,
    platform: Option<Platform>,
    pushes_seen: u64,
}

/// Typed client used by renderer-side code.
///
/// Keeps a read-only copy of the window state, written only by
/// `window:onMaximizeChange` pushes and by [`ClientFacade::refresh_window_state`],
/// and routes fired shortcuts to per-id handlers.
pub struct ClientFacade {
    api: CapabilityApi,
    window: Arc<Mutex<WindowCache>>,
    shortcuts: Arc<Mutex<HashMap<String, ShortcutHandler>>>,
}

impl ClientFacade {
    pub fn new(api: CapabilityApi) -> Self {
        let window = Arc::new(Mutex::new(WindowCache::default()));
        let shortcuts: Arc<Mutex<HashMap<String, ShortcutHandler>>> =
            Arc::new(Mutex::new(HashMap::new()));

        let cache = Arc::clone(&window);
        api.window().on_maximize_change(move |maximized| {
            if let Ok(mut c) = cache.lock() {
                c.maximized = maximized;
                c.pushes_seen += 1;
            }
        });

        let routes = Arc::clone(&shortcuts);
        api.system().on_shortcut_triggered(move |id| {
            let handler = routes.lock().ok().and_then(|r| r.get(&id).cloned());
            match handler {
                Some(handler) => handler(),
                None => debug!(shortcut_id = %id, "shortcut fired with no handler"),
            }
        });

        Self {
            api,
            window,
            shortcuts,
        }
    }

    pub fn api(&self) -> &CapabilityApi {
        &self.api
    }

    /// Last maximized flag delivered by the host.
    pub fn cached_maximized(&self) -> bool {
        self.window.lock().map(|c| c.maximized).unwrap_or(false)
    }

    /// Number of maximize pushes applied to the cache.
    pub fn maximize_pushes_seen(&self) -> u64 {
        self.window.lock().map(|c| c.pushes_seen).unwrap_or(0)
    }

    /// Cached state, once the platform is known.
    pub fn window_state(&self) -> Option<WindowState> {
        let cache = self.window.lock().ok()?;
        Some(WindowState {
            maximized: cache.maximized,
            platform: cache.platform?,
        })
    }

    /// Query the host and refresh the cache. A maximize push that lands
    /// while the query is in flight is newer than the reply and wins.
    pub async fn refresh_window_state(&self) -> Result<WindowState, RemoteError> {
        let platform = self.api.system().get_platform().await?;
        let seen_before = self.maximize_pushes_seen();
        let queried = self.api.window().is_maximized().await?;
        let maximized = match self.window.lock() {
            Ok(mut cache) => {
                cache.platform = Some(platform);
                if cache.pushes_seen == seen_before {
                    cache.maximized = queried;
                }
                cache.maximized
            }
            Err(_) => queried,
        };
        Ok(WindowState {
            maximized,
            platform,
        })
    }

    /// Register a global shortcut and route its triggers to `handler`.
    /// Returns the host's answer; the handler is kept only on `true`.
    pub async fn register_shortcut<F>(
        &self,
        accelerator: &str,
        id: &str,
        handler: F,
    ) -> Result<bool, RemoteError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let registered = self.api.system().register_shortcut(accelerator, id).await?;
        if registered {
            if let Ok(mut routes) = self.shortcuts.lock() {
                routes.insert(id.to_string(), Arc::new(handler));
            }
        }
        Ok(registered)
    }

    pub async fn unregister_shortcut(&self, id: &str) -> Result<(), RemoteError> {
        if let Ok(mut routes) = self.shortcuts.lock() {
            routes.remove(id);
        }
        self.api.system().unregister_shortcut(id).await
    }
}
