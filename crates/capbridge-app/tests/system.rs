mod common;

use capbridge_app::connect_in_process;
use capbridge_common::{
    MessageBoxOptions, NotificationOptions, OpenDialogOptions, OpenDialogResult, Platform,
    SaveDialogOptions,
};
use capbridge_config::CapbridgeConfig;
use capbridge_ipc::{CapabilityApi, ErrorCode};
use serde_json::json;

use common::{bounded, host, host_with};

#[tokio::test]
async fn version_and_platform() {
    let mut config = CapbridgeConfig::default();
    config.app.version = "2.4.1".into();
    let h = host_with(config, Platform::Windows);
    let api = CapabilityApi::new(connect_in_process(&h.ctx).unwrap());

    assert_eq!(api.system().get_version().await.unwrap(), "2.4.1");
    assert_eq!(api.system().get_platform().await.unwrap(), Platform::Windows);
}

#[tokio::test]
async fn clipboard_round_trip() {
    let h = host(Platform::Linux);
    let api = CapabilityApi::new(connect_in_process(&h.ctx).unwrap());

    api.system().write_clipboard("copied text").await.unwrap();
    assert_eq!(api.system().read_clipboard().await.unwrap(), "copied text");
}

#[tokio::test]
async fn open_external_allows_web_links_only() {
    let h = host(Platform::Linux);
    let api = CapabilityApi::new(connect_in_process(&h.ctx).unwrap());

    api.system().open_external("https://example.com/docs").await.unwrap();
    let err = bounded(api.system().open_external("file:///etc/passwd"))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::HandlerFailed);
    assert_eq!(err.channel, "system:openExternal");
    assert_eq!(h.desktop.opened_urls(), vec!["https://example.com/docs"]);
}

#[tokio::test]
async fn show_item_in_folder_is_recorded() {
    let h = host(Platform::Mac);
    let api = CapabilityApi::new(connect_in_process(&h.ctx).unwrap());

    api.system()
        .show_item_in_folder("/Users/me/report.pdf")
        .await
        .unwrap();
    assert_eq!(h.desktop.revealed_paths(), vec!["/Users/me/report.pdf"]);
}

#[tokio::test]
async fn dialogs_return_result_records() {
    let h = host(Platform::Linux);
    h.desktop.queue_open_result(OpenDialogResult {
        canceled: false,
        file_paths: vec!["/tmp/a.png".into()],
    });
    h.desktop.queue_message_response(1);
    let api = CapabilityApi::new(connect_in_process(&h.ctx).unwrap());

    let opened = api
        .system()
        .show_open_dialog(OpenDialogOptions::default())
        .await
        .unwrap();
    assert_eq!(opened.file_paths, vec!["/tmp/a.png"]);

    let saved = api
        .system()
        .show_save_dialog(SaveDialogOptions::default())
        .await
        .unwrap();
    assert!(saved.canceled);
    assert!(saved.file_path.is_none());

    let answer = api
        .system()
        .show_message_box(MessageBoxOptions {
            message: "Discard changes?".into(),
            buttons: vec!["Keep".into(), "Discard".into()],
            ..MessageBoxOptions::default()
        })
        .await
        .unwrap();
    assert_eq!(answer.response, 1);
    assert_eq!(h.desktop.message_boxes()[0].message, "Discard changes?");
}

#[tokio::test]
async fn notification_is_delivered() {
    let h = host(Platform::Linux);
    let api = CapabilityApi::new(connect_in_process(&h.ctx).unwrap());

    api.system()
        .show_notification(NotificationOptions {
            title: "Saved".into(),
            body: "All changes saved".into(),
        })
        .await
        .unwrap();
    assert_eq!(h.desktop.notifications()[0].title, "Saved");
}

#[tokio::test]
async fn malformed_arguments_get_a_structured_reply() {
    use capbridge_ipc::transport::loopback;
    use capbridge_app::HostDispatcher;
    use std::sync::Arc;

    let h = host(Platform::Linux);
    let registry = Arc::new(h.ctx.build_registry().unwrap());
    let (host_end, client_end) = loopback();
    let (outgoing, incoming) = host_end.split();
    tokio::spawn(HostDispatcher::new(&h.ctx, registry, outgoing).run(incoming));

    let (to_host, mut from_host) = client_end.split();
    let frames = [
        json!({"type": "invoke", "id": 1, "channel": "storage:set", "args": [42]}),
        json!({"type": "invoke", "id": 2, "channel": "window:minimize", "args": []}),
        json!({"type": "invoke", "id": 3, "channel": "fs:readFile", "args": ["/etc/passwd"]}),
    ];
    for frame in frames {
        to_host.send(frame.to_string()).unwrap();
    }

    let mut codes = Vec::new();
    for _ in 0..3 {
        let frame: serde_json::Value =
            serde_json::from_str(&bounded(from_host.recv()).await.unwrap()).unwrap();
        assert_eq!(frame["ok"], false);
        let code = frame["error"]["code"].as_str().unwrap().to_string();
        codes.push((frame["id"].as_u64().unwrap(), code));
    }
    codes.sort();
    assert_eq!(
        codes,
        vec![
            (1, "bad_arguments".to_string()),
            (2, "wrong_mode".to_string()),
            (3, "unknown_channel".to_string()),
        ]
    );
}
