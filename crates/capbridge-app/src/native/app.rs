//! `ApplicationHandler` for the winit event loop.

use std::sync::Arc;

use capbridge_common::{CapbridgeError, Platform};
use capbridge_config::CapbridgeConfig;
use capbridge_ipc::bridge::{js_deliver_frame, SessionToken};
use capbridge_platform::{paths, NativeDesktop};
use global_hotkey::GlobalHotKeyManager;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoopProxy};
use winit::window::{Window, WindowAttributes, WindowId};
use wry::WebView;

use super::hotkeys::{HotkeyQueue, MainThreadHotkeys};
use super::window::WinitWindow;
use super::{webview, UserEvent};
use crate::context::{HostContext, HostServices};
use crate::dispatcher::HostDispatcher;
use crate::window::{ChromeConfig, RendererSource};

struct Running {
    ctx: Arc<HostContext>,
    window: Arc<Window>,
    webview: WebView,
    token: SessionToken,
    hotkeys: Option<GlobalHotKeyManager>,
}

pub struct NativeApp {
    config: CapbridgeConfig,
    runtime: Runtime,
    proxy: EventLoopProxy<UserEvent>,
    queue: HotkeyQueue,
    running: Option<Running>,
}

impl NativeApp {
    pub fn new(
        config: CapbridgeConfig,
        runtime: Runtime,
        proxy: EventLoopProxy<UserEvent>,
    ) -> Self {
        Self {
            config,
            runtime,
            proxy,
            queue: HotkeyQueue::default(),
            running: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<Running, CapbridgeError> {
        let platform = Platform::current();
        let chrome = ChromeConfig::for_platform(platform, &self.config.window);
        let window = Arc::new(
            event_loop
                .create_window(window_attributes(&chrome))
                .map_err(|e| CapbridgeError::Window(e.to_string()))?,
        );

        let hotkeys = match GlobalHotKeyManager::new() {
            Ok(manager) => {
                self.queue.install_event_handler();
                Some(manager)
            }
            Err(e) => {
                warn!(error = %e, "global hotkeys unavailable");
                None
            }
        };

        let services = HostServices {
            window: Box::new(WinitWindow::new(window.clone(), self.proxy.clone())),
            hotkeys: Box::new(MainThreadHotkeys::new(self.queue.clone(), self.proxy.clone())),
            desktop: Arc::new(NativeDesktop::new()),
            storage_path: paths::storage_file(&self.config.storage.file_name)?,
        };
        let ctx = Arc::new(HostContext::with_platform(self.config.clone(), services, platform));

        let registry = Arc::new(
            ctx.build_registry()
                .map_err(|e| CapbridgeError::Bridge(e.to_string()))?,
        );
        let (to_host, from_renderer) = mpsc::unbounded_channel();
        let (to_renderer, mut outgoing) = mpsc::unbounded_channel::<String>();

        let dispatcher = HostDispatcher::new(&ctx, registry, to_renderer);
        self.runtime.spawn(dispatcher.run(from_renderer));

        let proxy = self.proxy.clone();
        self.runtime.spawn(async move {
            while let Some(frame) = outgoing.recv().await {
                if proxy.send_event(UserEvent::Deliver(frame)).is_err() {
                    break;
                }
            }
        });

        let token = SessionToken::generate();
        let bootstrap = match ctx.bridge().bootstrap_script(&token) {
            Ok(script) => Some(script),
            Err(e) => {
                error!(error = %e, "capability bridge not installed");
                None
            }
        };

        let source = RendererSource::select(&self.config, paths::renderer_dir()?);
        info!(url = %source.start_url(), "loading renderer");
        let webview = webview::build(&window, &ctx, &source, bootstrap, token.clone(), to_host)
            .map_err(|e| CapbridgeError::Window(e.to_string()))?;

        Ok(Running {
            ctx,
            window,
            webview,
            token,
            hotkeys,
        })
    }

    /// Without a manager, queued registrations are refused rather than left
    /// waiting.
    fn drain_hotkeys(&self) {
        let manager = self.running.as_ref().and_then(|r| r.hotkeys.as_ref());
        self.queue.drain(manager);
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(running) = &self.running {
            running.ctx.shutdown();
        }
        // Releases queued by shutdown run here; the loop will not wake again.
        self.drain_hotkeys();
        self.running = None;
        event_loop.exit();
    }
}

fn window_attributes(chrome: &ChromeConfig) -> WindowAttributes {
    let attrs = Window::default_attributes()
        .with_title(chrome.title.clone())
        .with_inner_size(LogicalSize::new(chrome.width, chrome.height))
        .with_min_inner_size(LogicalSize::new(chrome.min_width, chrome.min_height))
        .with_visible(false)
        .with_decorations(!chrome.is_frameless());

    #[cfg(target_os = "macos")]
    let attrs = {
        use crate::window::TitleBarStyle;
        use winit::platform::macos::WindowAttributesExtMacOS;

        let inset = chrome.title_bar == TitleBarStyle::HiddenInset;
        attrs
            .with_titlebar_transparent(inset)
            .with_title_hidden(inset)
            .with_fullsize_content_view(inset)
    };

    #[cfg(target_os = "windows")]
    let attrs = {
        use winit::platform::windows::{
            BackdropType, Color as CaptionColor, WindowAttributesExtWindows,
        };

        let mut attrs = attrs;
        if let Some(overlay) = chrome.overlay {
            let tint = overlay.color;
            let background = (!tint.is_transparent())
                .then(|| CaptionColor::from_rgb(tint.r, tint.g, tint.b));
            let symbol = overlay.symbol_color;
            attrs = attrs
                .with_title_background_color(background)
                .with_title_text_color(CaptionColor::from_rgb(symbol.r, symbol.g, symbol.b));
        }
        if chrome.mica {
            attrs = attrs.with_system_backdrop(BackdropType::MainWindow);
        }
        attrs
    };

    attrs
}

impl ApplicationHandler<UserEvent> for NativeApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        match self.start(event_loop) {
            Ok(running) => self.running = Some(running),
            Err(e) => {
                error!(error = %e, "failed to start window");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Window close requested");
                if let Some(running) = &self.running {
                    if let Err(e) = running.ctx.window().close() {
                        warn!(error = %e, "window close failed");
                    }
                }
                self.shutdown(event_loop);
            }
            WindowEvent::Resized(_) => {
                if let Some(running) = &self.running {
                    running.ctx.window().sync_maximized();
                }
            }
            _ => {}
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: UserEvent) {
        match event {
            UserEvent::Deliver(frame) => {
                if let Some(running) = &self.running {
                    let script = js_deliver_frame(&frame, &running.token);
                    if let Err(e) = running.webview.evaluate_script(&script) {
                        warn!(error = %e, "failed to deliver frame to renderer");
                    }
                }
            }
            UserEvent::Hotkeys => self.drain_hotkeys(),
            UserEvent::OpenDevtools => {
                if let Some(running) = &self.running {
                    running.webview.open_devtools();
                }
            }
            UserEvent::Close => {
                if let Some(running) = &self.running {
                    running.window.set_visible(false);
                }
                self.shutdown(event_loop);
            }
        }
    }
}
