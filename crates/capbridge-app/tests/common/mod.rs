#![allow(dead_code)]

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use capbridge_app::{HeadlessWindow, HostContext, HostServices};
use capbridge_common::Platform;
use capbridge_config::CapbridgeConfig;
use capbridge_platform::{MemoryDesktop, ProcessHotkeys};
use tempfile::TempDir;

/// A host wired to in-memory doubles, plus handles to inspect them.
pub struct TestHost {
    pub ctx: HostContext,
    pub window: HeadlessWindow,
    pub hotkeys: ProcessHotkeys,
    pub desktop: Arc<MemoryDesktop>,
    pub dir: TempDir,
}

pub fn host(platform: Platform) -> TestHost {
    host_with(CapbridgeConfig::default(), platform)
}

pub fn host_with(config: CapbridgeConfig, platform: Platform) -> TestHost {
    let dir = tempfile::tempdir().unwrap();
    let window = HeadlessWindow::new();
    let hotkeys = ProcessHotkeys::new();
    let desktop = Arc::new(MemoryDesktop::new());

    let services = HostServices {
        window: Box::new(window.clone()),
        hotkeys: Box::new(hotkeys.clone()),
        desktop: desktop.clone(),
        storage_path: dir.path().join(&config.storage.file_name),
    };
    let ctx = HostContext::with_platform(config, services, platform);

    TestHost {
        ctx,
        window,
        hotkeys,
        desktop,
        dir,
    }
}

/// Poll `check` until it holds or two seconds pass.
pub async fn eventually<F>(mut check: F)
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !check() {
        assert!(tokio::time::Instant::now() < deadline, "condition never held");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

/// Fail instead of hanging when a call never resolves.
pub async fn bounded<T>(fut: impl Future<Output = T>) -> T {
    tokio::time::timeout(Duration::from_secs(2), fut)
        .await
        .expect("call did not resolve")
}
