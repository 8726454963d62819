pub mod dialogs;
pub mod errors;
pub mod events;
pub mod types;

pub use dialogs::{
    FileFilter, MessageBoxKind, MessageBoxOptions, MessageBoxResult, NotificationOptions,
    OpenDialogOptions, OpenDialogProperty, OpenDialogResult, SaveDialogOptions, SaveDialogResult,
};
pub use errors::{CapbridgeError, ConfigError, PlatformError, StorageError};
pub use events::{EventBus, HostEvent};
pub use types::{Color, Platform, TitleBarOverlay, WindowState};

pub type Result<T> = std::result::Result<T, CapbridgeError>;
