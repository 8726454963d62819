use std::sync::Arc;

use capbridge_common::TitleBarOverlay;
use capbridge_ipc::catalog::window::{Close, IsMaximized, Maximize, Minimize, SetTitleBarOverlay};
use capbridge_ipc::{ChannelRegistry, HandlerError, RegistryError};

use crate::window::WindowService;

pub(super) fn register(
    registry: &mut ChannelRegistry,
    window: &Arc<WindowService>,
) -> Result<(), RegistryError> {
    let svc = window.clone();
    registry.register_listener::<Minimize, _>(move |()| Ok(svc.minimize()?))?;

    let svc = window.clone();
    registry.register_listener::<Maximize, _>(move |()| Ok(svc.toggle_maximize()?))?;

    let svc = window.clone();
    registry.register_listener::<Close, _>(move |()| Ok(svc.close()?))?;

    let svc = window.clone();
    registry.register_request_handler::<IsMaximized, _, _>(move |()| {
        is_maximized(svc.clone())
    })?;

    let svc = window.clone();
    registry.register_request_handler::<SetTitleBarOverlay, _, _>(move |(overlay,)| {
        set_title_bar_overlay(svc.clone(), overlay)
    })?;

    Ok(())
}

async fn is_maximized(svc: Arc<WindowService>) -> Result<bool, HandlerError> {
    Ok(svc.is_maximized())
}

async fn set_title_bar_overlay(
    svc: Arc<WindowService>,
    overlay: TitleBarOverlay,
) -> Result<(), HandlerError> {
    svc.set_title_bar_overlay(&overlay)?;
    Ok(())
}
