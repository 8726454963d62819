mod common;

use std::sync::{Arc, Mutex};

use capbridge_app::{connect_in_process, WindowPhase};
use capbridge_common::{Platform, TitleBarOverlay};
use capbridge_ipc::{CapabilityApi, ClientFacade};

use common::{bounded, eventually, host};

#[tokio::test]
async fn maximize_pushes_arrive_in_transition_order() {
    let h = host(Platform::Linux);
    h.ctx.window().ready_to_show().unwrap();
    let api = CapabilityApi::new(connect_in_process(&h.ctx).unwrap());
    let facade = ClientFacade::new(api.clone());

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    api.window().on_maximize_change(move |m| sink.lock().unwrap().push(m));

    for _ in 0..3 {
        api.window().maximize().unwrap();
    }

    eventually(|| seen.lock().unwrap().len() == 3).await;
    assert_eq!(*seen.lock().unwrap(), vec![true, false, true]);
    assert!(facade.cached_maximized());
    assert_eq!(facade.maximize_pushes_seen(), 3);
    assert_eq!(h.ctx.window().phase(), WindowPhase::Maximized);
}

#[tokio::test]
async fn is_maximized_reads_the_window_not_a_cache() {
    let h = host(Platform::Linux);
    let api = CapabilityApi::new(connect_in_process(&h.ctx).unwrap());

    assert!(!bounded(api.window().is_maximized()).await.unwrap());
    // The user maximizes; no resize has been synced yet.
    h.window.set_maximized_externally(true);
    assert!(api.window().is_maximized().await.unwrap());
}

#[tokio::test]
async fn user_resize_is_pushed_after_sync() {
    let h = host(Platform::Linux);
    let api = CapabilityApi::new(connect_in_process(&h.ctx).unwrap());
    let facade = ClientFacade::new(api);

    h.window.set_maximized_externally(true);
    h.ctx.window().sync_maximized();

    eventually(|| facade.maximize_pushes_seen() == 1).await;
    assert!(facade.cached_maximized());

    let state = facade.refresh_window_state().await.unwrap();
    assert!(state.maximized);
    assert_eq!(state.platform, Platform::Linux);
}

#[tokio::test]
async fn minimize_and_close_reach_the_window() {
    let h = host(Platform::Mac);
    let api = CapabilityApi::new(connect_in_process(&h.ctx).unwrap());

    api.window().minimize().unwrap();
    eventually(|| h.window.snapshot().minimized).await;

    api.window().close().unwrap();
    eventually(|| h.ctx.window().phase() == WindowPhase::Destroyed).await;
    assert!(h.window.snapshot().closed);
    assert!(!api.window().is_maximized().await.unwrap());
}

#[tokio::test]
async fn overlay_is_applied_on_windows_only() {
    let overlay = TitleBarOverlay {
        color: "#202020".into(),
        symbol_color: "#f0f0f0".into(),
        height: Some(40),
    };

    let linux = host(Platform::Linux);
    let api = CapabilityApi::new(connect_in_process(&linux.ctx).unwrap());
    bounded(api.window().set_title_bar_overlay(overlay.clone()))
        .await
        .unwrap();
    assert!(linux.window.snapshot().overlay.is_none());

    let windows = host(Platform::Windows);
    let api = CapabilityApi::new(connect_in_process(&windows.ctx).unwrap());
    api.window().set_title_bar_overlay(overlay).await.unwrap();
    let (color, symbol, height) = windows.window.snapshot().overlay.unwrap();
    assert_eq!(color.to_hex(), "#202020");
    assert_eq!(symbol.to_hex(), "#f0f0f0");
    assert_eq!(height, 40);
}
