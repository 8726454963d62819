//! Renderer side of the bridge.

mod api;
mod connection;
mod facade;

#[cfg(test)]
mod tests;

pub use api::{CapabilityApi, StorageApi, SystemApi, WindowApi};
pub use connection::ClientConnection;
pub use facade::ClientFacade;
