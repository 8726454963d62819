use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use capbridge_common::PlatformError;
use tracing::debug;

use crate::accelerator::Accelerator;

/// Callback armed for a global hotkey.
pub type TriggerFn = Arc<dyn Fn() + Send + Sync>;

/// OS-level global hotkey registration.
///
/// Implementations report rejection (key already taken by another
/// application, unsupported key) as `Err`; the [`ShortcutManager`] turns that
/// into a plain `false` for the renderer.
///
/// [`ShortcutManager`]: super::ShortcutManager
pub trait HotkeyBackend: Send {
    fn register(&mut self, accel: &Accelerator, on_trigger: TriggerFn)
        -> Result<(), PlatformError>;

    fn unregister(&mut self, accel: &Accelerator) -> Result<(), PlatformError>;

    fn is_registered(&self, accel: &Accelerator) -> bool;
}

#[derive(Default)]
struct Bindings {
    armed: HashMap<Accelerator, TriggerFn>,
    /// Combinations held by some other process.
    external: HashSet<Accelerator>,
}

/// In-process hotkey table.
///
/// Used by headless mode and tests. Clones share the same table, so a test
/// can keep a handle to fire keys after handing the backend to a manager.
#[derive(Clone, Default)]
pub struct ProcessHotkeys {
    inner: Arc<Mutex<Bindings>>,
}

impl ProcessHotkeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the user pressing `accel`. Returns `false` if nothing is
    /// armed for it.
    pub fn trigger(&self, accel: &Accelerator) -> bool {
        let callback = match self.inner.lock() {
            Ok(bindings) => bindings.armed.get(accel).cloned(),
            Err(_) => None,
        };
        match callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    /// Mark `accel` as owned by another application so registration fails.
    pub fn claim_external(&self, accel: Accelerator) {
        if let Ok(mut bindings) = self.inner.lock() {
            bindings.external.insert(accel);
        }
    }

    pub fn binding_count(&self) -> usize {
        self.inner.lock().map(|b| b.armed.len()).unwrap_or(0)
    }
}

impl HotkeyBackend for ProcessHotkeys {
    fn register(
        &mut self,
        accel: &Accelerator,
        on_trigger: TriggerFn,
    ) -> Result<(), PlatformError> {
        let mut bindings = self
            .inner
            .lock()
            .map_err(|_| PlatformError::HotkeyError("hotkey table poisoned".into()))?;
        if bindings.external.contains(accel) {
            return Err(PlatformError::HotkeyError(format!(
                "{accel} is registered by another application"
            )));
        }
        if bindings.armed.contains_key(accel) {
            return Err(PlatformError::HotkeyError(format!(
                "{accel} is already registered"
            )));
        }
        bindings.armed.insert(accel.clone(), on_trigger);
        debug!(accelerator = %accel, "hotkey armed");
        Ok(())
    }

    fn unregister(&mut self, accel: &Accelerator) -> Result<(), PlatformError> {
        let mut bindings = self
            .inner
            .lock()
            .map_err(|_| PlatformError::HotkeyError("hotkey table poisoned".into()))?;
        bindings.armed.remove(accel);
        Ok(())
    }

    fn is_registered(&self, accel: &Accelerator) -> bool {
        self.inner
            .lock()
            .map(|b| b.armed.contains_key(accel))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accelerator::parse_for;
    use capbridge_common::Platform;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn accel(s: &str) -> Accelerator {
        parse_for(s, Platform::Linux).unwrap()
    }

    #[test]
    fn trigger_runs_armed_callback() {
        let mut hotkeys = ProcessHotkeys::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        hotkeys
            .register(
                &accel("Ctrl+K"),
                Arc::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();

        assert!(hotkeys.trigger(&accel("Control+k")));
        assert!(!hotkeys.trigger(&accel("Ctrl+J")));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn external_claim_rejects_registration() {
        let mut hotkeys = ProcessHotkeys::new();
        hotkeys.claim_external(accel("Alt+Space"));
        let err = hotkeys
            .register(&accel("Alt+Space"), Arc::new(|| {}))
            .unwrap_err();
        assert!(err.to_string().contains("another application"));
    }

    #[test]
    fn clones_share_bindings() {
        let mut hotkeys = ProcessHotkeys::new();
        let handle = hotkeys.clone();
        hotkeys.register(&accel("F5"), Arc::new(|| {})).unwrap();
        assert!(handle.is_registered(&accel("F5")));
        hotkeys.unregister(&accel("F5")).unwrap();
        assert_eq!(handle.binding_count(), 0);
    }
}
