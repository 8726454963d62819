use std::sync::Arc;

use capbridge_common::{
    MessageBoxOptions, MessageBoxResult, NotificationOptions, OpenDialogOptions, OpenDialogResult,
    Platform, SaveDialogOptions, SaveDialogResult,
};
use capbridge_ipc::catalog::system::{
    GetPlatform, GetVersion, OpenExternal, ReadClipboard, RegisterShortcut, ShowItemInFolder,
    ShowMessageBox, ShowNotification, ShowOpenDialog, ShowSaveDialog, UnregisterShortcut,
    WriteClipboard,
};
use capbridge_ipc::{ChannelRegistry, HandlerError, RegistryError};

use crate::system::SystemService;

pub(super) fn register(
    registry: &mut ChannelRegistry,
    system: &Arc<SystemService>,
) -> Result<(), RegistryError> {
    let s = system.clone();
    registry.register_request_handler::<GetVersion, _, _>(move |()| get_version(s.clone()))?;

    let s = system.clone();
    registry.register_request_handler::<GetPlatform, _, _>(move |()| get_platform(s.clone()))?;

    let s = system.clone();
    registry.register_request_handler::<OpenExternal, _, _>(move |(url,)| {
        open_external(s.clone(), url)
    })?;

    let s = system.clone();
    registry.register_request_handler::<ShowItemInFolder, _, _>(move |(path,)| {
        show_item_in_folder(s.clone(), path)
    })?;

    let s = system.clone();
    registry.register_request_handler::<ReadClipboard, _, _>(move |()| read_clipboard(s.clone()))?;

    let s = system.clone();
    registry.register_request_handler::<WriteClipboard, _, _>(move |(text,)| {
        write_clipboard(s.clone(), text)
    })?;

    let s = system.clone();
    registry.register_request_handler::<ShowOpenDialog, _, _>(move |(options,)| {
        show_open_dialog(s.clone(), options)
    })?;

    let s = system.clone();
    registry.register_request_handler::<ShowSaveDialog, _, _>(move |(options,)| {
        show_save_dialog(s.clone(), options)
    })?;

    let s = system.clone();
    registry.register_request_handler::<ShowMessageBox, _, _>(move |(options,)| {
        show_message_box(s.clone(), options)
    })?;

    let s = system.clone();
    registry.register_request_handler::<ShowNotification, _, _>(move |(options,)| {
        show_notification(s.clone(), options)
    })?;

    let s = system.clone();
    registry.register_request_handler::<RegisterShortcut, _, _>(move |(accelerator, id)| {
        register_shortcut(s.clone(), accelerator, id)
    })?;

    let s = system.clone();
    registry.register_request_handler::<UnregisterShortcut, _, _>(move |(id,)| {
        unregister_shortcut(s.clone(), id)
    })?;

    Ok(())
}

async fn get_version(s: Arc<SystemService>) -> Result<String, HandlerError> {
    Ok(s.version().to_string())
}

async fn get_platform(s: Arc<SystemService>) -> Result<Platform, HandlerError> {
    Ok(s.platform())
}

async fn open_external(s: Arc<SystemService>, url: String) -> Result<(), HandlerError> {
    Ok(s.desktop().open_external(&url)?)
}

async fn show_item_in_folder(s: Arc<SystemService>, path: String) -> Result<(), HandlerError> {
    Ok(s.desktop().show_item_in_folder(&path)?)
}

async fn read_clipboard(s: Arc<SystemService>) -> Result<String, HandlerError> {
    Ok(s.desktop().read_clipboard()?)
}

async fn write_clipboard(s: Arc<SystemService>, text: String) -> Result<(), HandlerError> {
    Ok(s.desktop().write_clipboard(&text)?)
}

async fn show_open_dialog(
    s: Arc<SystemService>,
    options: OpenDialogOptions,
) -> Result<OpenDialogResult, HandlerError> {
    Ok(s.desktop().show_open_dialog(options).await?)
}

async fn show_save_dialog(
    s: Arc<SystemService>,
    options: SaveDialogOptions,
) -> Result<SaveDialogResult, HandlerError> {
    Ok(s.desktop().show_save_dialog(options).await?)
}

async fn show_message_box(
    s: Arc<SystemService>,
    options: MessageBoxOptions,
) -> Result<MessageBoxResult, HandlerError> {
    Ok(s.desktop().show_message_box(options).await?)
}

async fn show_notification(
    s: Arc<SystemService>,
    options: NotificationOptions,
) -> Result<(), HandlerError> {
    Ok(s.desktop().show_notification(&options)?)
}

async fn register_shortcut(
    s: Arc<SystemService>,
    accelerator: String,
    id: String,
) -> Result<bool, HandlerError> {
    Ok(s.register_shortcut(&accelerator, &id))
}

async fn unregister_shortcut(s: Arc<SystemService>, id: String) -> Result<(), HandlerError> {
    s.unregister_shortcut(&id);
    Ok(())
}
