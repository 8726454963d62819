use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("clipboard error: {0}")]
    ClipboardError(String),

    #[error("path error: {0}")]
    PathError(String),

    #[error("notification error: {0}")]
    NotificationError(String),

    #[error("shell error: {0}")]
    ShellError(String),

    #[error("dialog error: {0}")]
    DialogError(String),

    #[error("hotkey error: {0}")]
    HotkeyError(String),

    #[error("invalid accelerator: {0}")]
    InvalidAccelerator(String),

    #[error("window error: {0}")]
    WindowError(String),

    #[error("not supported: {0}")]
    NotSupported(String),
}

/// Failures of the persisted key-value store.
///
/// None of these are fatal: read failures fall back to an empty store and
/// write failures leave the in-memory map ahead of the file.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to read store {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("failed to write store {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    #[error("store is not a JSON object: {0}")]
    Malformed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CapbridgeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("bridge error: {0}")]
    Bridge(String),

    #[error("window error: {0}")]
    Window(String),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("window.width = 10".into());
        assert_eq!(err.to_string(), "config validation error: window.width = 10");
    }

    #[test]
    fn platform_error_display() {
        let err = PlatformError::ClipboardError("access denied".into());
        assert_eq!(err.to_string(), "clipboard error: access denied");

        let err = PlatformError::InvalidAccelerator("Ctrl+".into());
        assert_eq!(err.to_string(), "invalid accelerator: Ctrl+");

        let err = PlatformError::NotSupported("dialogs".into());
        assert_eq!(err.to_string(), "not supported: dialogs");
    }

    #[test]
    fn storage_error_display_includes_path() {
        let err = StorageError::Write {
            path: PathBuf::from("/data/app-storage.json"),
            reason: "read-only file system".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to write store /data/app-storage.json: read-only file system"
        );
    }

    #[test]
    fn capbridge_error_from_platform() {
        let platform_err = PlatformError::HotkeyError("backend gone".into());
        let err: CapbridgeError = platform_err.into();
        assert!(matches!(err, CapbridgeError::Platform(_)));
        assert!(err.to_string().contains("backend gone"));
    }

    #[test]
    fn capbridge_error_from_storage() {
        let storage_err = StorageError::Malformed("array at root".into());
        let err: CapbridgeError = storage_err.into();
        assert!(matches!(err, CapbridgeError::Storage(_)));
    }

    #[test]
    fn capbridge_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: CapbridgeError = io_err.into();
        assert!(matches!(err, CapbridgeError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn capbridge_error_other_variants() {
        let err = CapbridgeError::Bridge("install failed".into());
        assert_eq!(err.to_string(), "bridge error: install failed");

        let err = CapbridgeError::Other("something went wrong".into());
        assert_eq!(err.to_string(), "something went wrong");
    }
}
