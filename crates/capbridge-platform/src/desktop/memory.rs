use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use capbridge_common::{
    MessageBoxOptions, MessageBoxResult, NotificationOptions, OpenDialogOptions, OpenDialogResult,
    PlatformError, SaveDialogOptions, SaveDialogResult,
};

use super::Desktop;
use crate::shell;

#[derive(Default)]
struct Recorded {
    opened_urls: Vec<String>,
    revealed: Vec<String>,
    clipboard: String,
    notifications: Vec<NotificationOptions>,
    open_results: VecDeque<OpenDialogResult>,
    save_results: VecDeque<SaveDialogResult>,
    message_responses: VecDeque<u32>,
    message_boxes: Vec<MessageBoxOptions>,
}

/// In-memory [`Desktop`] that records every call.
///
/// Dialogs answer from queued results and report "canceled" (or button 0)
/// once the queue is empty. URL checks match [`crate::NativeDesktop`].
#[derive(Default)]
pub struct MemoryDesktop {
    state: Mutex<Recorded>,
}

impl MemoryDesktop {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, Recorded>, PlatformError> {
        self.state
            .lock()
            .map_err(|_| PlatformError::NotSupported("memory desktop poisoned".into()))
    }

    pub fn queue_open_result(&self, result: OpenDialogResult) {
        if let Ok(mut s) = self.state() {
            s.open_results.push_back(result);
        }
    }

    pub fn queue_save_result(&self, result: SaveDialogResult) {
        if let Ok(mut s) = self.state() {
            s.save_results.push_back(result);
        }
    }

    pub fn queue_message_response(&self, response: u32) {
        if let Ok(mut s) = self.state() {
            s.message_responses.push_back(response);
        }
    }

    pub fn opened_urls(&self) -> Vec<String> {
        self.state().map(|s| s.opened_urls.clone()).unwrap_or_default()
    }

    pub fn revealed_paths(&self) -> Vec<String> {
        self.state().map(|s| s.revealed.clone()).unwrap_or_default()
    }

    pub fn notifications(&self) -> Vec<NotificationOptions> {
        self.state()
            .map(|s| s.notifications.clone())
            .unwrap_or_default()
    }

    pub fn message_boxes(&self) -> Vec<MessageBoxOptions> {
        self.state()
            .map(|s| s.message_boxes.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Desktop for MemoryDesktop {
    fn open_external(&self, url: &str) -> Result<(), PlatformError> {
        if !shell::is_external_url_allowed(url) {
            return Err(PlatformError::ShellError(format!("refusing to open {url:?}")));
        }
        self.state()?.opened_urls.push(url.to_string());
        Ok(())
    }

    fn show_item_in_folder(&self, path: &str) -> Result<(), PlatformError> {
        if path.is_empty() {
            return Err(PlatformError::ShellError("empty path".into()));
        }
        self.state()?.revealed.push(path.to_string());
        Ok(())
    }

    fn read_clipboard(&self) -> Result<String, PlatformError> {
        Ok(self.state()?.clipboard.clone())
    }

    fn write_clipboard(&self, text: &str) -> Result<(), PlatformError> {
        self.state()?.clipboard = text.to_string();
        Ok(())
    }

    async fn show_open_dialog(
        &self,
        _options: OpenDialogOptions,
    ) -> Result<OpenDialogResult, PlatformError> {
        Ok(self
            .state()?
            .open_results
            .pop_front()
            .unwrap_or_else(OpenDialogResult::canceled))
    }

    async fn show_save_dialog(
        &self,
        _options: SaveDialogOptions,
    ) -> Result<SaveDialogResult, PlatformError> {
        Ok(self
            .state()?
            .save_results
            .pop_front()
            .unwrap_or(SaveDialogResult {
                canceled: true,
                file_path: None,
            }))
    }

    async fn show_message_box(
        &self,
        options: MessageBoxOptions,
    ) -> Result<MessageBoxResult, PlatformError> {
        let mut state = self.state()?;
        state.message_boxes.push(options);
        let response = state.message_responses.pop_front().unwrap_or(0);
        Ok(MessageBoxResult { response })
    }

    fn show_notification(&self, options: &NotificationOptions) -> Result<(), PlatformError> {
        self.state()?.notifications.push(options.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clipboard_round_trip() {
        let desktop = MemoryDesktop::new();
        assert_eq!(desktop.read_clipboard().unwrap(), "");
        desktop.write_clipboard("copied").unwrap();
        assert_eq!(desktop.read_clipboard().unwrap(), "copied");
    }

    #[test]
    fn open_external_applies_scheme_policy() {
        let desktop = MemoryDesktop::new();
        desktop.open_external("https://example.com").unwrap();
        assert!(desktop.open_external("file:///etc/hosts").is_err());
        assert_eq!(desktop.opened_urls(), vec!["https://example.com"]);
    }

    #[tokio::test]
    async fn dialogs_default_to_canceled() {
        let desktop = MemoryDesktop::new();
        let open = desktop
            .show_open_dialog(OpenDialogOptions::default())
            .await
            .unwrap();
        assert!(open.canceled);
        let save = desktop
            .show_save_dialog(SaveDialogOptions::default())
            .await
            .unwrap();
        assert!(save.canceled);
    }

    #[tokio::test]
    async fn queued_results_are_returned_in_order() {
        let desktop = MemoryDesktop::new();
        desktop.queue_message_response(2);
        desktop.queue_open_result(OpenDialogResult {
            canceled: false,
            file_paths: vec!["/tmp/a.txt".into()],
        });

        let opts = MessageBoxOptions {
            message: "Quit?".into(),
            buttons: vec!["Save".into(), "Discard".into(), "Cancel".into()],
            ..Default::default()
        };
        assert_eq!(desktop.show_message_box(opts).await.unwrap().response, 2);
        assert_eq!(desktop.message_boxes().len(), 1);

        let open = desktop
            .show_open_dialog(OpenDialogOptions::default())
            .await
            .unwrap();
        assert_eq!(open.file_paths, vec!["/tmp/a.txt"]);
    }
}
