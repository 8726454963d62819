use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use super::*;
use crate::catalog::{storage, system, window};

fn counting_listener(registry: &mut ChannelRegistry) -> Arc<AtomicUsize> {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    registry
        .register_listener::<window::Minimize, _>(move |()| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .unwrap();
    hits
}

#[tokio::test]
async fn request_handler_returns_value() {
    let mut registry = ChannelRegistry::new();
    registry
        .register_request_handler::<storage::Has, _, _>(|(key,)| async move {
            Ok::<_, HandlerError>(key == "theme")
        })
        .unwrap();

    assert_eq!(registry.invoke("storage:has", json!(["theme"])).await, Ok(Some(json!(true))));
    assert_eq!(registry.invoke("storage:has", json!(["other"])).await, Ok(Some(json!(false))));
}

#[tokio::test]
async fn unit_output_is_null() {
    let mut registry = ChannelRegistry::new();
    registry
        .register_request_handler::<storage::Delete, _, _>(|(_key,)| async {
            Ok::<_, HandlerError>(())
        })
        .unwrap();
    assert_eq!(registry.invoke("storage:delete", json!(["k"])).await, Ok(Some(json!(null))));
}

#[tokio::test]
async fn handler_error_becomes_structured_failure() {
    let mut registry = ChannelRegistry::new();
    registry
        .register_request_handler::<system::ReadClipboard, _, _>(|()| async {
            Err::<String, _>(HandlerError::failed("clipboard unavailable"))
        })
        .unwrap();

    let err = registry.invoke("system:readClipboard", json!([])).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::HandlerFailed);
    assert_eq!(err.channel, "system:readClipboard");
    assert_eq!(err.message, "clipboard unavailable");
}

#[tokio::test]
async fn panicking_handler_is_contained() {
    let mut registry = ChannelRegistry::new();
    registry
        .register_request_handler::<system::GetVersion, _, _>(|()| async {
            if true {
                panic!("version lookup exploded");
            }
            Ok::<_, HandlerError>(String::new())
        })
        .unwrap();

    let err = registry.invoke("system:getVersion", json!([])).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::HandlerPanicked);
    assert!(err.message.contains("version lookup exploded"));

    // The registry keeps serving after a panic.
    let again = registry.invoke("system:getVersion", json!([])).await.unwrap_err();
    assert_eq!(again.code, ErrorCode::HandlerPanicked);
}

#[tokio::test]
async fn panic_while_building_future_is_contained() {
    let mut registry = ChannelRegistry::new();
    registry
        .register_request_handler::<system::GetPlatform, _, _>(
            |()| -> futures_util::future::Ready<Result<capbridge_common::Platform, HandlerError>> {
                panic!("sync panic")
            },
        )
        .unwrap();

    let err = registry.invoke("system:getPlatform", json!([])).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::HandlerPanicked);
}

#[tokio::test]
async fn bad_arguments_are_reported() {
    let mut registry = ChannelRegistry::new();
    registry
        .register_request_handler::<storage::Get, _, _>(|(_key,)| async {
            Ok::<_, HandlerError>(None)
        })
        .unwrap();

    for args in [json!([]), json!([1]), json!({"key": "x"})] {
        let err = registry.invoke("storage:get", args.clone()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BadArguments, "{args}");
    }
}

#[tokio::test]
async fn unknown_and_unregistered_channels() {
    let registry = ChannelRegistry::new();

    let err = registry.invoke("window:fly", json!([])).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::UnknownChannel);

    let err = registry.invoke("storage:get", json!(["k"])).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotRegistered);
}

#[tokio::test]
async fn mode_is_enforced_both_ways() {
    let mut registry = ChannelRegistry::new();
    counting_listener(&mut registry);
    registry
        .register_request_handler::<window::IsMaximized, _, _>(|()| async {
            Ok::<_, HandlerError>(false)
        })
        .unwrap();

    let err = registry.invoke("window:minimize", json!([])).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::WrongMode);

    let err = registry.send("window:isMaximized", json!([])).unwrap_err();
    assert_eq!(err.code, ErrorCode::WrongMode);
}

#[test]
fn duplicate_registration_is_rejected() {
    let mut registry = ChannelRegistry::new();
    let hits = counting_listener(&mut registry);

    let err = registry
        .register_listener::<window::Minimize, _>(|()| Err(HandlerError::failed("second")))
        .unwrap_err();
    assert_eq!(err, RegistryError::AlreadyRegistered(Channel::WindowMinimize));

    registry.send("window:minimize", json!([])).unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn listener_failures_stay_on_host() {
    let mut registry = ChannelRegistry::new();
    registry
        .register_listener::<window::Close, _>(|()| {
            Err(HandlerError::failed("window already gone"))
        })
        .unwrap();
    registry
        .register_listener::<window::Maximize, _>(|()| panic!("listener panic"))
        .unwrap();

    assert!(registry.send("window:close", json!([])).is_ok());
    assert!(registry.send("window:maximize", json!([])).is_ok());
}

#[tokio::test]
async fn requests_run_concurrently() {
    let mut registry = ChannelRegistry::new();
    registry
        .register_request_handler::<system::ShowMessageBox, _, _>(|(_opts,)| async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok::<_, HandlerError>(capbridge_common::MessageBoxResult { response: 1 })
        })
        .unwrap();
    registry
        .register_request_handler::<storage::Has, _, _>(|(_key,)| async {
            Ok::<_, HandlerError>(true)
        })
        .unwrap();

    let slow = tokio::spawn(registry.invoke("system:showMessageBox", json!([{"message": "?"}])));
    let fast = registry.invoke("storage:has", json!(["k"])).await;
    assert_eq!(fast, Ok(Some(json!(true))));
    assert!(!slow.is_finished());
    assert_eq!(slow.await.unwrap(), Ok(Some(json!({"response": 1}))));
}

#[test]
fn missing_lists_unbound_channels() {
    let mut registry = ChannelRegistry::new();
    assert_eq!(registry.missing().len(), Channel::ALL.len());
    counting_listener(&mut registry);
    assert!(!registry.missing().contains(&Channel::WindowMinimize));
    assert!(registry.handler_name(Channel::WindowMinimize).is_some());
    assert_eq!(registry.len(), 1);
}
