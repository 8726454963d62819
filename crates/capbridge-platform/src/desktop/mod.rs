//! The host's view of the user's desktop session.
//!
//! The `system:*` channels go through [`Desktop`] so the same handlers run
//! against the real OS ([`NativeDesktop`]) or a recording double
//! ([`MemoryDesktop`]).

mod memory;
mod native;

pub use memory::MemoryDesktop;
pub use native::NativeDesktop;

use async_trait::async_trait;
use capbridge_common::{
    MessageBoxOptions, MessageBoxResult, NotificationOptions, OpenDialogOptions, OpenDialogResult,
    PlatformError, SaveDialogOptions, SaveDialogResult,
};

#[async_trait]
pub trait Desktop: Send + Sync {
    fn open_external(&self, url: &str) -> Result<(), PlatformError>;

    fn show_item_in_folder(&self, path: &str) -> Result<(), PlatformError>;

    fn read_clipboard(&self) -> Result<String, PlatformError>;

    fn write_clipboard(&self, text: &str) -> Result<(), PlatformError>;

    async fn show_open_dialog(
        &self,
        options: OpenDialogOptions,
    ) -> Result<OpenDialogResult, PlatformError>;

    async fn show_save_dialog(
        &self,
        options: SaveDialogOptions,
    ) -> Result<SaveDialogResult, PlatformError>;

    async fn show_message_box(
        &self,
        options: MessageBoxOptions,
    ) -> Result<MessageBoxResult, PlatformError>;

    fn show_notification(&self, options: &NotificationOptions) -> Result<(), PlatformError>;
}
