use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use capbridge_common::Platform;
use serde_json::{json, Value};

use super::*;
use crate::catalog::{storage, system, window};
use crate::channel::PushChannel;
use crate::errors::HandlerError;
use crate::protocol::ErrorCode;
use crate::registry::ChannelRegistry;
use crate::{connect_loopback, transport};

fn storage_registry() -> ChannelRegistry {
    let map: Arc<Mutex<HashMap<String, Value>>> = Arc::default();
    let mut registry = ChannelRegistry::new();

    let m = Arc::clone(&map);
    registry
        .register_request_handler::<storage::Get, _, _>(move |(key,)| {
            let value = m.lock().unwrap().get(&key).cloned();
            async move { Ok::<_, HandlerError>(value) }
        })
        .unwrap();
    let m = Arc::clone(&map);
    registry
        .register_request_handler::<storage::Set, _, _>(move |(key, value)| {
            m.lock().unwrap().insert(key, value);
            async { Ok::<_, HandlerError>(()) }
        })
        .unwrap();
    let m = Arc::clone(&map);
    registry
        .register_request_handler::<storage::Has, _, _>(move |(key,)| {
            let has = m.lock().unwrap().contains_key(&key);
            async move { Ok::<_, HandlerError>(has) }
        })
        .unwrap();
    registry
        .register_request_handler::<system::GetPlatform, _, _>(|()| async {
            Ok::<_, HandlerError>(Platform::Linux)
        })
        .unwrap();
    registry
        .register_request_handler::<window::IsMaximized, _, _>(|()| async {
            Ok::<_, HandlerError>(true)
        })
        .unwrap();
    registry
}

#[tokio::test]
async fn storage_round_trip_over_loopback() {
    let (_server, conn) = connect_loopback(Arc::new(storage_registry()));
    let api = CapabilityApi::new(conn);

    assert_eq!(api.storage().get("theme").await.unwrap(), None);
    api.storage().set("theme", json!({"mode": "dark"})).await.unwrap();
    assert_eq!(
        api.storage().get("theme").await.unwrap(),
        Some(json!({"mode": "dark"}))
    );
    assert!(api.storage().has("theme").await.unwrap());
}

#[tokio::test]
async fn unregistered_channel_fails_structurally() {
    let (_server, conn) = connect_loopback(Arc::new(storage_registry()));
    let api = CapabilityApi::new(conn);

    let err = api.system().read_clipboard().await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotRegistered);
    assert_eq!(err.channel, "system:readClipboard");
}

#[tokio::test]
async fn pending_calls_resolve_when_transport_closes() {
    let (host, client) = transport::loopback();
    let api = CapabilityApi::new(ClientConnection::connect(client));
    let (_host_tx, mut host_rx) = host.split();

    let call = tokio::spawn({
        let api = api.clone();
        async move { api.storage().get("k").await }
    });

    // The host reads the invoke, then goes away without replying.
    let frame = host_rx.recv().await.unwrap();
    assert!(frame.contains("\"storage:get\""));
    drop(_host_tx);
    drop(host_rx);

    let err = tokio::time::timeout(Duration::from_secs(2), call)
        .await
        .unwrap()
        .unwrap()
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::TransportClosed);

    // Later calls fail immediately.
    tokio::time::sleep(Duration::from_millis(10)).await;
    let err = api.storage().has("k").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::TransportClosed);
    assert!(api.is_disconnected());
}

#[tokio::test]
async fn maximize_pushes_arrive_in_order() {
    let (server, conn) = connect_loopback(Arc::new(storage_registry()));
    let api = CapabilityApi::new(conn);
    let facade = ClientFacade::new(api.clone());

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    api.window().on_maximize_change(move |m| sink.lock().unwrap().push(m));

    for maximized in [true, false, true] {
        assert!(server.push(PushChannel::MaximizeChange, json!(maximized)));
    }
    // Round-trip a request so every earlier push has been processed.
    api.storage().has("sync").await.unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![true, false, true]);
    assert!(facade.cached_maximized());
    assert_eq!(facade.maximize_pushes_seen(), 3);
}

#[tokio::test]
async fn refresh_overwrites_cache() {
    let (_server, conn) = connect_loopback(Arc::new(storage_registry()));
    let facade = ClientFacade::new(CapabilityApi::new(conn));

    assert!(facade.window_state().is_none());
    let state = facade.refresh_window_state().await.unwrap();
    assert!(state.maximized);
    assert_eq!(state.platform, Platform::Linux);
    assert_eq!(facade.window_state(), Some(state));
}

#[tokio::test]
async fn push_during_refresh_is_not_overwritten() {
    let slot: Arc<OnceLock<crate::BridgeServer>> = Arc::default();
    let mut registry = ChannelRegistry::new();
    registry
        .register_request_handler::<system::GetPlatform, _, _>(|()| async {
            Ok::<_, HandlerError>(Platform::Windows)
        })
        .unwrap();
    let pusher = Arc::clone(&slot);
    registry
        .register_request_handler::<window::IsMaximized, _, _>(move |()| {
            // The window maximizes after the state was read; the push is
            // queued ahead of the stale reply.
            if let Some(server) = pusher.get() {
                server.push(PushChannel::MaximizeChange, json!(true));
            }
            async { Ok::<_, HandlerError>(false) }
        })
        .unwrap();

    let (server, conn) = connect_loopback(Arc::new(registry));
    assert!(slot.set(server).is_ok());
    let facade = ClientFacade::new(CapabilityApi::new(conn));

    let state = facade.refresh_window_state().await.unwrap();
    assert!(state.maximized);
    assert!(facade.cached_maximized());
    assert_eq!(facade.maximize_pushes_seen(), 1);
    assert_eq!(facade.window_state().unwrap().platform, Platform::Windows);
}

#[tokio::test]
async fn null_value_is_kept_apart_from_absent_key() {
    let (_server, conn) = connect_loopback(Arc::new(storage_registry()));
    let api = CapabilityApi::new(conn);

    api.storage().set("cleared", Value::Null).await.unwrap();
    assert_eq!(api.storage().get("cleared").await.unwrap(), Some(Value::Null));
    assert_eq!(api.storage().get("never-set").await.unwrap(), None);
}

#[tokio::test]
async fn shortcut_pushes_route_by_id() {
    let mut registry = storage_registry();
    registry
        .register_request_handler::<system::RegisterShortcut, _, _>(|(_accel, id)| async move {
            Ok::<_, HandlerError>(id != "taken")
        })
        .unwrap();
    registry
        .register_request_handler::<system::UnregisterShortcut, _, _>(|(_id,)| async {
            Ok::<_, HandlerError>(())
        })
        .unwrap();
    let (server, conn) = connect_loopback(Arc::new(registry));
    let facade = ClientFacade::new(CapabilityApi::new(conn));

    let fired = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&fired);
    assert!(facade
        .register_shortcut("CommandOrControl+K", "search", move || {
            sink.lock().unwrap().push("search")
        })
        .await
        .unwrap());
    assert!(!facade
        .register_shortcut("CommandOrControl+J", "taken", || {})
        .await
        .unwrap());

    server.push(PushChannel::ShortcutTriggered, json!("search"));
    server.push(PushChannel::ShortcutTriggered, json!("unknown"));
    facade.api().storage().has("sync").await.unwrap();
    assert_eq!(*fired.lock().unwrap(), vec!["search"]);

    facade.unregister_shortcut("search").await.unwrap();
    server.push(PushChannel::ShortcutTriggered, json!("search"));
    facade.api().storage().has("sync").await.unwrap();
    assert_eq!(fired.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn malformed_invoke_with_id_gets_reply() {
    let registry = Arc::new(storage_registry());
    let (host, client) = transport::loopback();
    let (host_out, host_in) = host.split();
    let server = crate::BridgeServer::new(registry, host_out);
    tokio::spawn(async move { server.run(host_in).await });

    let (client_tx, mut client_rx) = client.split();
    client_tx
        .send(r#"{"type":"invoke","id":9,"args":[]}"#.to_string())
        .unwrap();
    client_tx.send("garbage".to_string()).unwrap();
    client_tx
        .send(r#"{"type":"invoke","id":10,"channel":"window:fly","args":[]}"#.to_string())
        .unwrap();

    let first: Value = serde_json::from_str(&client_rx.recv().await.unwrap()).unwrap();
    assert_eq!(first["id"], 9);
    assert_eq!(first["error"]["code"], "bad_arguments");

    let second: Value = serde_json::from_str(&client_rx.recv().await.unwrap()).unwrap();
    assert_eq!(second["id"], 10);
    assert_eq!(second["error"]["code"], "unknown_channel");
}
