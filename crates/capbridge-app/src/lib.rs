//! The capbridge host process.
//!
//! A [`HostContext`] owns the window, storage and system services; its
//! registry binds every catalogue channel to them, and a
//! [`HostDispatcher`] serves that registry to one renderer over any
//! transport.

pub mod context;
pub mod dispatcher;
pub mod logging;
mod modules;
pub mod storage;
pub mod system;
pub mod window;

#[cfg(feature = "native")]
pub mod native;

pub use context::{HostContext, HostServices};
pub use dispatcher::{serve, HostDispatcher};
pub use storage::PersistedStore;
pub use system::SystemService;
pub use window::{HeadlessWindow, NativeWindow, WindowPhase, WindowService};

use std::sync::Arc;

use capbridge_ipc::transport::loopback;
use capbridge_ipc::{ClientConnection, RegistryError};

/// Serve `ctx` to an in-process client. Must be called inside a tokio
/// runtime; the host side runs as a spawned task until the client drops or
/// the context shuts down.
pub fn connect_in_process(ctx: &HostContext) -> Result<ClientConnection, RegistryError> {
    let registry = Arc::new(ctx.build_registry()?);
    let (host, client) = loopback();
    let (outgoing, incoming) = host.split();
    let dispatcher = HostDispatcher::new(ctx, registry, outgoing);
    tokio::spawn(dispatcher.run(incoming));
    Ok(ClientConnection::connect(client))
}
