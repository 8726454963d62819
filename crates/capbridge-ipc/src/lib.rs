//! The capability bridge between the capbridge host and its renderer.
//!
//! - [`channel`] and [`catalog`]: the closed channel set and its types
//! - [`protocol`]: JSON frames and structured errors
//! - [`registry`] and [`server`]: host-side dispatch
//! - [`transport`]: loopback and line-delimited stdio
//! - [`bridge`]: the capability object's shape and installation
//! - [`client`]: the renderer-side API and facade

pub mod bridge;
pub mod catalog;
pub mod channel;
pub mod client;
pub mod errors;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod transport;

pub use bridge::{
    CapabilityBridge, InstallStrategy, Installation, MemoryRendererContext, RendererContext,
};
pub use catalog::{ListenerChannel, RequestChannel};
pub use channel::{Channel, ChannelMode, PushChannel};
pub use client::{CapabilityApi, ClientConnection, ClientFacade};
pub use errors::{BridgeError, HandlerError, RegistryError};
pub use protocol::{ErrorCode, RemoteError};
pub use registry::ChannelRegistry;
pub use server::BridgeServer;
pub use transport::Endpoint;

/// Serve `registry` over a fresh loopback transport and return a connected
/// client. Pushes can be sent through the returned server.
///
/// Must be called inside a tokio runtime.
pub fn connect_loopback(
    registry: std::sync::Arc<ChannelRegistry>,
) -> (BridgeServer, ClientConnection) {
    let (host, client) = transport::loopback();
    let (outgoing, incoming) = host.split();
    let server = BridgeServer::new(registry, outgoing);
    let runner = server.clone();
    tokio::spawn(async move { runner.run(incoming).await });
    (server, ClientConnection::connect(client))
}
