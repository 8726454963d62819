//! Global keyboard shortcuts.

mod backend;
mod manager;

pub use backend::{HotkeyBackend, ProcessHotkeys, TriggerFn};
pub use manager::ShortcutManager;
