use std::sync::Mutex;

use capbridge_common::PlatformError;

/// System clipboard backed by `arboard`.
///
/// The OS handle is opened on first use and kept for the life of the
/// process; headless hosts without a display never touch it.
#[derive(Default)]
pub struct Clipboard {
    inner: Mutex<Option<arboard::Clipboard>>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads text from the system clipboard.
    pub fn get_text(&self) -> Result<String, PlatformError> {
        self.with_handle(|cb| cb.get_text())
    }

    /// Writes text to the system clipboard.
    pub fn set_text(&self, text: &str) -> Result<(), PlatformError> {
        self.with_handle(|cb| cb.set_text(text.to_owned()))
    }

    fn with_handle<T>(
        &self,
        f: impl FnOnce(&mut arboard::Clipboard) -> Result<T, arboard::Error>,
    ) -> Result<T, PlatformError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| PlatformError::ClipboardError("clipboard lock poisoned".into()))?;
        if guard.is_none() {
            let handle = arboard::Clipboard::new()
                .map_err(|e| PlatformError::ClipboardError(e.to_string()))?;
            *guard = Some(handle);
        }
        match guard.as_mut() {
            Some(cb) => f(cb).map_err(|e| PlatformError::ClipboardError(e.to_string())),
            None => Err(PlatformError::ClipboardError("clipboard unavailable".into())),
        }
    }
}
