use std::fs;

use capbridge_common::PlatformError;

use super::resolve::{data_dir, log_dir};

/// Creates the data and log directories if they do not already exist.
pub fn ensure_dirs() -> Result<(), PlatformError> {
    fs::create_dir_all(data_dir()?).map_err(|e| PlatformError::PathError(e.to_string()))?;
    fs::create_dir_all(log_dir()?).map_err(|e| PlatformError::PathError(e.to_string()))?;
    Ok(())
}
