use std::path::Path;

use async_trait::async_trait;
use capbridge_common::{
    MessageBoxOptions, MessageBoxResult, NotificationOptions, OpenDialogOptions, OpenDialogResult,
    PlatformError, SaveDialogOptions, SaveDialogResult,
};

use super::Desktop;
use crate::{clipboard::Clipboard, dialogs, notifications, shell};

/// [`Desktop`] backed by the running OS session.
#[derive(Default)]
pub struct NativeDesktop {
    clipboard: Clipboard,
}

impl NativeDesktop {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Desktop for NativeDesktop {
    fn open_external(&self, url: &str) -> Result<(), PlatformError> {
        shell::open_external(url)
    }

    fn show_item_in_folder(&self, path: &str) -> Result<(), PlatformError> {
        shell::show_item_in_folder(Path::new(path))
    }

    fn read_clipboard(&self) -> Result<String, PlatformError> {
        self.clipboard.get_text()
    }

    fn write_clipboard(&self, text: &str) -> Result<(), PlatformError> {
        self.clipboard.set_text(text)
    }

    async fn show_open_dialog(
        &self,
        options: OpenDialogOptions,
    ) -> Result<OpenDialogResult, PlatformError> {
        dialogs::show_open_dialog(&options).await
    }

    async fn show_save_dialog(
        &self,
        options: SaveDialogOptions,
    ) -> Result<SaveDialogResult, PlatformError> {
        dialogs::show_save_dialog(&options).await
    }

    async fn show_message_box(
        &self,
        options: MessageBoxOptions,
    ) -> Result<MessageBoxResult, PlatformError> {
        dialogs::show_message_box(&options).await
    }

    fn show_notification(&self, options: &NotificationOptions) -> Result<(), PlatformError> {
        notifications::notify(&options.title, &options.body)
    }
}
