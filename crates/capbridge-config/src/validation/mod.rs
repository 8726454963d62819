//! Full configuration validation.
//!
//! Each check appends to a shared error list so a single `ConfigError`
//! reports every problem at once.

mod helpers;


use capbridge_common::ConfigError;

use crate::schema::CapbridgeConfig;

use helpers::{validate_non_empty, validate_range};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &CapbridgeConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_window(&mut errors, config);
    validate_bridge(&mut errors, config);
    validate_dev(&mut errors, config);
    validate_storage(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_window(errors: &mut Vec<String>, config: &CapbridgeConfig) {
    let w = &config.window;
    validate_range(errors, "window.min_width", w.min_width, 200, 7680);
    validate_range(errors, "window.min_height", w.min_height, 150, 4320);
    validate_range(errors, "window.width", w.width, w.min_width.max(200), 7680);
    validate_range(errors, "window.height", w.height, w.min_height.max(150), 4320);
    validate_range(errors, "window.titlebar_height", w.titlebar_height, 0, 200);
}

fn validate_bridge(errors: &mut Vec<String>, config: &CapbridgeConfig) {
    let key = &config.bridge.global_key;
    validate_non_empty(errors, "bridge.global_key", key);

    let is_identifier = key
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if !key.trim().is_empty() && !is_identifier {
        errors.push(format!(
            "bridge.global_key = {key:?} is not a valid JavaScript identifier"
        ));
    }
}

fn validate_dev(errors: &mut Vec<String>, config: &CapbridgeConfig) {
    if let Some(url) = &config.dev.renderer_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(format!("dev.renderer_url = {url:?} must be an http(s) URL"));
        }
    }
}

fn validate_storage(errors: &mut Vec<String>, config: &CapbridgeConfig) {
    let name = &config.storage.file_name;
    validate_non_empty(errors, "storage.file_name", name);
    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        errors.push(format!(
            "storage.file_name = {name:?} must be a plain file name"
        ));
    }
}
