use std::collections::HashMap;
use std::sync::Arc;

use capbridge_common::{EventBus, HostEvent, Platform};
use tracing::{debug, info, warn};

use super::backend::{HotkeyBackend, TriggerFn};
use crate::accelerator::{self, Accelerator};

/// Owns the `id -> accelerator` table and the OS bindings behind it.
///
/// A trigger publishes [`HostEvent::ShortcutTriggered`] on the event bus; the
/// host forwards that to the renderer.
pub struct ShortcutManager {
    backend: Box<dyn HotkeyBackend>,
    entries: HashMap<String, Accelerator>,
    events: Arc<EventBus>,
    platform: Platform,
}

impl ShortcutManager {
    pub fn new(backend: Box<dyn HotkeyBackend>, events: Arc<EventBus>) -> Self {
        Self::with_platform(backend, events, Platform::current())
    }

    /// Manager that parses accelerators for `platform` instead of the host OS.
    pub fn with_platform(
        backend: Box<dyn HotkeyBackend>,
        events: Arc<EventBus>,
        platform: Platform,
    ) -> Self {
        Self {
            backend,
            entries: HashMap::new(),
            events,
            platform,
        }
    }

    /// Bind `accelerator` to `id`. Returns `false` when the string does not
    /// parse, when another id already owns the same key combination, or when
    /// the OS refuses the binding.
    ///
    /// Registering an id again with a different accelerator moves it; the
    /// old binding is released only once the new one is in place.
    pub fn register(&mut self, accelerator: &str, id: &str) -> bool {
        let accel = match accelerator::parse_for(accelerator, self.platform) {
            Ok(accel) => accel,
            Err(e) => {
                warn!(shortcut_id = id, accelerator, error = %e, "rejecting shortcut");
                return false;
            }
        };

        if let Some(owner) = self.owner_of(&accel) {
            if owner == id {
                debug!(shortcut_id = id, accelerator, "shortcut already registered");
                return true;
            }
            warn!(
                shortcut_id = id,
                accelerator,
                owner,
                "accelerator already bound to another shortcut"
            );
            return false;
        }

        let events = Arc::clone(&self.events);
        let trigger_id = id.to_string();
        let on_trigger: TriggerFn = Arc::new(move || {
            debug!(shortcut_id = %trigger_id, "shortcut fired");
            events.publish(HostEvent::ShortcutTriggered {
                id: trigger_id.clone(),
            });
        });

        if let Err(e) = self.backend.register(&accel, on_trigger) {
            warn!(shortcut_id = id, accelerator, error = %e, "OS refused shortcut");
            return false;
        }

        if let Some(previous) = self.entries.insert(id.to_string(), accel) {
            if let Err(e) = self.backend.unregister(&previous) {
                warn!(
                    shortcut_id = id,
                    accelerator = %previous,
                    error = %e,
                    "failed to release replaced shortcut"
                );
            }
        }
        info!(shortcut_id = id, accelerator, "shortcut registered");
        true
    }

    /// Release the binding for `id`. Unknown ids are ignored.
    pub fn unregister(&mut self, id: &str) {
        let Some(accel) = self.entries.remove(id) else {
            debug!(shortcut_id = id, "unregister for unknown shortcut ignored");
            return;
        };
        match self.backend.unregister(&accel) {
            Ok(()) => info!(shortcut_id = id, accelerator = %accel, "shortcut unregistered"),
            Err(e) => warn!(
                shortcut_id = id,
                accelerator = %accel,
                error = %e,
                "failed to release shortcut"
            ),
        }
    }

    /// Release every binding. Returns how many entries were removed.
    pub fn unregister_all(&mut self) -> usize {
        let ids: Vec<String> = self.entries.keys().cloned().collect();
        for id in &ids {
            self.unregister(id);
        }
        ids.len()
    }

    pub fn accelerator_for(&self, id: &str) -> Option<&Accelerator> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn owner_of(&self, accel: &Accelerator) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, bound)| *bound == accel)
            .map(|(id, _)| id.as_str())
    }
}

impl std::fmt::Debug for ShortcutManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShortcutManager")
            .field("entries", &self.entries)
            .field("platform", &self.platform)
            .finish_non_exhaustive()
    }
}
