//! The capability object handed to the renderer.
//!
//! Three namespaces with a fixed method list each. Nothing here forwards an
//! arbitrary channel name; every method is tied to one catalogue entry.

use capbridge_common::{
    MessageBoxOptions, MessageBoxResult, NotificationOptions, OpenDialogOptions, OpenDialogResult,
    Platform, SaveDialogOptions, SaveDialogResult, TitleBarOverlay,
};
use serde_json::Value;

use super::connection::ClientConnection;
use crate::catalog::{storage, system, window};
use crate::channel::PushChannel;
use crate::protocol::RemoteError;

#[derive(Clone)]
pub struct CapabilityApi {
    conn: ClientConnection,
}

impl CapabilityApi {
    pub fn new(conn: ClientConnection) -> Self {
        Self { conn }
    }

    pub fn window(&self) -> WindowApi<'_> {
        WindowApi { conn: &self.conn }
    }

    pub fn storage(&self) -> StorageApi<'_> {
        StorageApi { conn: &self.conn }
    }

    pub fn system(&self) -> SystemApi<'_> {
        SystemApi { conn: &self.conn }
    }

    /// Whether the underlying transport has closed.
    pub fn is_disconnected(&self) -> bool {
        self.conn.is_closed()
    }
}

impl std::fmt::Debug for CapabilityApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityApi")
            .field("disconnected", &self.is_disconnected())
            .finish()
    }
}

pub struct WindowApi<'a> {
    conn: &'a ClientConnection,
}

impl WindowApi<'_> {
    pub fn minimize(&self) -> Result<(), RemoteError> {
        self.conn.notify::<window::Minimize>(())
    }

    /// Maximize, or restore if already maximized.
    pub fn maximize(&self) -> Result<(), RemoteError> {
        self.conn.notify::<window::Maximize>(())
    }

    pub fn close(&self) -> Result<(), RemoteError> {
        self.conn.notify::<window::Close>(())
    }

    pub async fn is_maximized(&self) -> Result<bool, RemoteError> {
        self.conn.request::<window::IsMaximized>(()).await
    }

    pub async fn set_title_bar_overlay(&self, overlay: TitleBarOverlay) -> Result<(), RemoteError> {
        self.conn
            .request::<window::SetTitleBarOverlay>((overlay,))
            .await
    }

    /// Called with every maximize/restore, in the order the host pushed
    /// them. Non-boolean payloads are ignored.
    pub fn on_maximize_change<F>(&self, callback: F)
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.conn
            .subscribe(PushChannel::MaximizeChange, move |payload: &Value| {
                if let Some(maximized) = payload.as_bool() {
                    callback(maximized);
                }
            });
    }
}

pub struct StorageApi<'a> {
    conn: &'a ClientConnection,
}

impl StorageApi<'_> {
    /// `None` when the key is absent.
    pub async fn get(&self, key: &str) -> Result<Option<Value>, RemoteError> {
        self.conn.request::<storage::Get>((key.to_string(),)).await
    }

    pub async fn set(&self, key: &str, value: Value) -> Result<(), RemoteError> {
        self.conn
            .request::<storage::Set>((key.to_string(), value))
            .await
    }

    pub async fn delete(&self, key: &str) -> Result<(), RemoteError> {
        self.conn
            .request::<storage::Delete>((key.to_string(),))
            .await
    }

    pub async fn has(&self, key: &str) -> Result<bool, RemoteError> {
        self.conn.request::<storage::Has>((key.to_string(),)).await
    }
}

pub struct SystemApi<'a> {
    conn: &'a ClientConnection,
}

impl SystemApi<'_> {
    pub async fn get_version(&self) -> Result<String, RemoteError> {
        self.conn.request::<system::GetVersion>(()).await
    }

    pub async fn get_platform(&self) -> Result<Platform, RemoteError> {
        self.conn.request::<system::GetPlatform>(()).await
    }

    pub async fn open_external(&self, url: &str) -> Result<(), RemoteError> {
        self.conn
            .request::<system::OpenExternal>((url.to_string(),))
            .await
    }

    pub async fn show_item_in_folder(&self, path: &str) -> Result<(), RemoteError> {
        self.conn
            .request::<system::ShowItemInFolder>((path.to_string(),))
            .await
    }

    pub async fn read_clipboard(&self) -> Result<String, RemoteError> {
        self.conn.request::<system::ReadClipboard>(()).await
    }

    pub async fn write_clipboard(&self, text: &str) -> Result<(), RemoteError> {
        self.conn
            .request::<system::WriteClipboard>((text.to_string(),))
            .await
    }

    pub async fn show_open_dialog(
        &self,
        options: OpenDialogOptions,
    ) -> Result<OpenDialogResult, RemoteError> {
        self.conn.request::<system::ShowOpenDialog>((options,)).await
    }

    pub async fn show_save_dialog(
        &self,
        options: SaveDialogOptions,
    ) -> Result<SaveDialogResult, RemoteError> {
        self.conn.request::<system::ShowSaveDialog>((options,)).await
    }

    pub async fn show_message_box(
        &self,
        options: MessageBoxOptions,
    ) -> Result<MessageBoxResult, RemoteError> {
        self.conn.request::<system::ShowMessageBox>((options,)).await
    }

    pub async fn show_notification(&self, options: NotificationOptions) -> Result<(), RemoteError> {
        self.conn
            .request::<system::ShowNotification>((options,))
            .await
    }

    /// `false` when the OS or another id already holds the accelerator.
    pub async fn register_shortcut(
        &self,
        accelerator: &str,
        id: &str,
    ) -> Result<bool, RemoteError> {
        self.conn
            .request::<system::RegisterShortcut>((accelerator.to_string(), id.to_string()))
            .await
    }

    pub async fn unregister_shortcut(&self, id: &str) -> Result<(), RemoteError> {
        self.conn
            .request::<system::UnregisterShortcut>((id.to_string(),))
            .await
    }

    /// Called with the id of every fired shortcut.
    pub fn on_shortcut_triggered<F>(&self, callback: F)
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.conn
            .subscribe(PushChannel::ShortcutTriggered, move |payload: &Value| {
                if let Some(id) = payload.as_str() {
                    callback(id.to_string());
                }
            });
    }
}
