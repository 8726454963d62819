//! OS integration for the capbridge host: accelerators and global
//! shortcuts, clipboard, shell, notifications, dialogs, and paths.

pub mod accelerator;
pub mod clipboard;
pub mod desktop;
pub mod dialogs;
pub mod notifications;
pub mod paths;
pub mod shell;
pub mod shortcuts;

pub use accelerator::{Accelerator, Modifier};
pub use clipboard::Clipboard;
pub use desktop::{Desktop, MemoryDesktop, NativeDesktop};
pub use notifications::notify;
pub use paths::{data_dir, ensure_dirs, log_dir, renderer_dir, storage_file};
pub use shortcuts::{HotkeyBackend, ProcessHotkeys, ShortcutManager, TriggerFn};
