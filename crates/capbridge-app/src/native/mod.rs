//! Desktop shell: a winit window hosting the renderer in a wry webview.

mod app;
mod hotkeys;
mod webview;
mod window;

use capbridge_common::CapbridgeError;
use capbridge_config::CapbridgeConfig;
use winit::event_loop::EventLoop;

pub use app::NativeApp;

/// Wakeups posted to the event loop from other threads.
#[derive(Debug)]
pub enum UserEvent {
    /// A host frame to hand to the renderer.
    Deliver(String),
    /// Hotkey commands are queued.
    Hotkeys,
    OpenDevtools,
    /// `window:close` was called.
    Close,
}

/// Open the window and run until it closes.
pub fn run(config: CapbridgeConfig) -> Result<(), CapbridgeError> {
    let runtime = tokio::runtime::Runtime::new()?;
    let event_loop = EventLoop::<UserEvent>::with_user_event()
        .build()
        .map_err(|e| CapbridgeError::Window(e.to_string()))?;

    let mut app = NativeApp::new(config, runtime, event_loop.create_proxy());
    tracing::info!("Entering event loop");
    event_loop
        .run_app(&mut app)
        .map_err(|e| CapbridgeError::Window(e.to_string()))
}
