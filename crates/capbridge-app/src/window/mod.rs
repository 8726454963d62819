//! The top-level window: chrome, lifecycle and the renderer it loads.

pub mod chrome;
mod headless;
mod native_window;
pub mod renderer;
mod service;

pub use chrome::{ChromeConfig, TitleBarStyle};
pub use headless::{HeadlessState, HeadlessWindow};
pub use native_window::NativeWindow;
pub use renderer::RendererSource;
pub use service::{WindowPhase, WindowService};
