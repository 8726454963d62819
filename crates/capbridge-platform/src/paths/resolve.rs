use std::path::PathBuf;

use capbridge_common::PlatformError;

pub(super) const APP_NAME: &str = "capbridge";

/// Returns the platform-specific data directory.
///
/// - macOS: `~/Library/Application Support/capbridge`
/// - Linux: `$XDG_DATA_HOME/capbridge` (defaults to `~/.local/share/capbridge`)
/// - Windows: `%APPDATA%\capbridge`
pub fn data_dir() -> Result<PathBuf, PlatformError> {
    Ok(dirs::data_dir()
        .ok_or_else(|| PlatformError::PathError("could not determine data directory".into()))?
        .join(APP_NAME))
}

/// Returns the path to the log directory, `data_dir()/logs`.
pub fn log_dir() -> Result<PathBuf, PlatformError> {
    Ok(data_dir()?.join("logs"))
}

/// Returns the path of the persisted store named `file_name` in the data
/// directory.
pub fn storage_file(file_name: &str) -> Result<PathBuf, PlatformError> {
    Ok(data_dir()?.join(file_name))
}

/// Directory holding the packaged renderer, `<exe dir>/renderer`.
pub fn renderer_dir() -> Result<PathBuf, PlatformError> {
    let exe = std::env::current_exe()
        .map_err(|e| PlatformError::PathError(format!("could not locate executable: {e}")))?;
    let dir = exe
        .parent()
        .ok_or_else(|| PlatformError::PathError("executable has no parent directory".into()))?;
    Ok(dir.join("renderer"))
}
