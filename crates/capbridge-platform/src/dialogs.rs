//! Native file and message dialogs.
//!
//! Backed by `rfd` when the `dialogs` feature is enabled. Without it every
//! call fails with [`PlatformError::NotSupported`] so a headless host still
//! answers the renderer instead of hanging.

use capbridge_common::{
    MessageBoxOptions, MessageBoxResult, OpenDialogOptions, OpenDialogResult, PlatformError,
    SaveDialogOptions, SaveDialogResult,
};

/// Most buttons a native message box can carry.
pub const MAX_MESSAGE_BUTTONS: usize = 3;

/// Map the label a message box reports back to its index in `buttons`.
/// Unknown labels map to the last button, which is the cancel position.
pub fn button_index(label: &str, buttons: &[String]) -> u32 {
    let last = buttons.len().saturating_sub(1);
    let index = buttons.iter().position(|b| b == label).unwrap_or(last);
    u32::try_from(index).unwrap_or(0)
}

#[cfg(feature = "dialogs")]
mod native {
    use std::path::Path;

    use rfd::{
        AsyncFileDialog, AsyncMessageDialog, MessageButtons, MessageDialogResult, MessageLevel,
    };
    use tracing::warn;

    use super::*;
    use capbridge_common::{FileFilter, MessageBoxKind};

    fn file_dialog(
        title: Option<&str>,
        default_path: Option<&str>,
        filters: &[FileFilter],
    ) -> AsyncFileDialog {
        let mut dialog = AsyncFileDialog::new();
        if let Some(title) = title {
            dialog = dialog.set_title(title);
        }
        if let Some(default_path) = default_path {
            let path = Path::new(default_path);
            if path.is_dir() {
                dialog = dialog.set_directory(path);
            } else {
                if let Some(parent) = path.parent() {
                    dialog = dialog.set_directory(parent);
                }
                if let Some(name) = path.file_name() {
                    dialog = dialog.set_file_name(name.to_string_lossy());
                }
            }
        }
        for filter in filters {
            dialog = dialog.add_filter(&filter.name, &filter.extensions);
        }
        dialog
    }

    fn path_string(handle: &rfd::FileHandle) -> String {
        handle.path().to_string_lossy().into_owned()
    }

    pub async fn show_open_dialog(
        options: &OpenDialogOptions,
    ) -> Result<OpenDialogResult, PlatformError> {
        let dialog = file_dialog(
            options.title.as_deref(),
            options.default_path.as_deref(),
            &options.filters,
        );
        let picked: Option<Vec<rfd::FileHandle>> =
            match (options.wants_directory(), options.wants_multiple()) {
                (true, true) => dialog.pick_folders().await,
                (true, false) => dialog.pick_folder().await.map(|h| vec![h]),
                (false, true) => dialog.pick_files().await,
                (false, false) => dialog.pick_file().await.map(|h| vec![h]),
            };
        Ok(match picked {
            Some(handles) if !handles.is_empty() => OpenDialogResult {
                canceled: false,
                file_paths: handles.iter().map(path_string).collect(),
            },
            _ => OpenDialogResult::canceled(),
        })
    }

    pub async fn show_save_dialog(
        options: &SaveDialogOptions,
    ) -> Result<SaveDialogResult, PlatformError> {
        let dialog = file_dialog(
            options.title.as_deref(),
            options.default_path.as_deref(),
            &options.filters,
        );
        Ok(match dialog.save_file().await {
            Some(handle) => SaveDialogResult {
                canceled: false,
                file_path: Some(path_string(&handle)),
            },
            None => SaveDialogResult {
                canceled: true,
                file_path: None,
            },
        })
    }

    pub async fn show_message_box(
        options: &MessageBoxOptions,
    ) -> Result<MessageBoxResult, PlatformError> {
        let mut buttons = options.buttons.clone();
        if buttons.len() > MAX_MESSAGE_BUTTONS {
            warn!(count = buttons.len(), "message box truncated to {MAX_MESSAGE_BUTTONS} buttons");
            buttons.truncate(MAX_MESSAGE_BUTTONS);
        }

        let level = match options.kind {
            MessageBoxKind::Error => MessageLevel::Error,
            MessageBoxKind::Warning => MessageLevel::Warning,
            MessageBoxKind::None | MessageBoxKind::Info | MessageBoxKind::Question => {
                MessageLevel::Info
            }
        };
        let rfd_buttons = match buttons.as_slice() {
            [] => MessageButtons::Ok,
            [a] => MessageButtons::OkCustom(a.clone()),
            [a, b] => MessageButtons::OkCancelCustom(a.clone(), b.clone()),
            [a, b, c, ..] => MessageButtons::YesNoCancelCustom(a.clone(), b.clone(), c.clone()),
        };
        let description = match &options.detail {
            Some(detail) => format!("{}\n\n{detail}", options.message),
            None => options.message.clone(),
        };

        let mut dialog = AsyncMessageDialog::new()
            .set_level(level)
            .set_description(description)
            .set_buttons(rfd_buttons);
        if let Some(title) = &options.title {
            dialog = dialog.set_title(title);
        }

        let response = match dialog.show().await {
            MessageDialogResult::Custom(label) => button_index(&label, &buttons),
            MessageDialogResult::Ok | MessageDialogResult::Yes => 0,
            MessageDialogResult::No => 1,
            MessageDialogResult::Cancel => button_index("", &buttons),
        };
        Ok(MessageBoxResult { response })
    }
}

#[cfg(feature = "dialogs")]
pub use native::{show_message_box, show_open_dialog, show_save_dialog};

#[cfg(not(feature = "dialogs"))]
pub async fn show_open_dialog(
    _options: &OpenDialogOptions,
) -> Result<OpenDialogResult, PlatformError> {
    Err(not_supported())
}

#[cfg(not(feature = "dialogs"))]
pub async fn show_save_dialog(
    _options: &SaveDialogOptions,
) -> Result<SaveDialogResult, PlatformError> {
    Err(not_supported())
}

#[cfg(not(feature = "dialogs"))]
pub async fn show_message_box(
    _options: &MessageBoxOptions,
) -> Result<MessageBoxResult, PlatformError> {
    Err(not_supported())
}

#[cfg(not(feature = "dialogs"))]
fn not_supported() -> PlatformError {
    PlatformError::NotSupported("native dialogs (built without the `dialogs` feature)".into())
}
