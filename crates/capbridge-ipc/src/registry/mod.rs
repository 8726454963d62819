//! Host-side channel registry.
//!
//! Binds each catalogue channel to at most one handler and turns calls into
//! replies. Request handlers are async and may fail or panic; the caller
//! always gets either the encoded output or a [`RemoteError`]. Listeners run
//! synchronously and their failures are only logged.

mod entry;

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::future::Future;

use futures_util::future::{self, BoxFuture, FutureExt};
use serde_json::Value;
use tracing::{debug, warn};

use crate::catalog::{ListenerChannel, RequestChannel};
use crate::channel::{Channel, ChannelMode};
use crate::errors::{HandlerError, RegistryError};
use crate::protocol::{ErrorCode, RemoteError};
use entry::Entry;
pub use entry::RequestResult;

#[derive(Default)]
pub struct ChannelRegistry {
    entries: HashMap<Channel, Entry>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an async handler to a request-response channel. A second
    /// registration for the same channel is rejected and the first handler
    /// stays.
    pub fn register_request_handler<C, F, Fut>(
        &mut self,
        handler: F,
    ) -> Result<(), RegistryError>
    where
        C: RequestChannel,
        F: Fn(C::Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<C::Output, HandlerError>> + Send + 'static,
    {
        self.check_free(C::CHANNEL, ChannelMode::RequestResponse)?;
        let entry = entry::wrap_request::<C, F, Fut>(handler);
        debug!(channel = %C::CHANNEL, handler = entry.name(), "request handler registered");
        self.entries.insert(C::CHANNEL, entry);
        Ok(())
    }

    /// Bind a handler to a fire-and-forget channel.
    pub fn register_listener<C, F>(&mut self, handler: F) -> Result<(), RegistryError>
    where
        C: ListenerChannel,
        F: Fn(C::Args) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.check_free(C::CHANNEL, ChannelMode::FireAndForget)?;
        let entry = entry::wrap_listener::<C, F>(handler);
        debug!(channel = %C::CHANNEL, handler = entry.name(), "listener registered");
        self.entries.insert(C::CHANNEL, entry);
        Ok(())
    }

    pub fn is_registered(&self, channel: Channel) -> bool {
        self.entries.contains_key(&channel)
    }

    pub fn handler_name(&self, channel: Channel) -> Option<&'static str> {
        self.entries.get(&channel).map(Entry::name)
    }

    /// Catalogue channels with no handler, in catalogue order.
    pub fn missing(&self) -> Vec<Channel> {
        Channel::ALL
            .iter()
            .copied()
            .filter(|c| !self.is_registered(*c))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve `channel_id` and prepare the request. The handler runs when
    /// the returned future is first polled; the future owns everything it
    /// needs, so it can be spawned while other calls proceed.
    ///
    /// `Ok(None)` is a successful reply without a value.
    pub fn invoke(&self, channel_id: &str, args: Value) -> BoxFuture<'static, RequestResult> {
        match self.lookup(channel_id, ChannelMode::RequestResponse) {
            Ok(Entry::Request { handler, .. }) => handler(args),
            Ok(Entry::Listener { .. }) => future::ready(Err(wrong_mode(
                channel_id,
                ChannelMode::RequestResponse,
            )))
            .boxed(),
            Err(e) => future::ready(Err(e)).boxed(),
        }
    }

    /// Deliver a fire-and-forget call. `Err` only reports routing problems
    /// (unknown channel, wrong mode, nothing registered); handler failures
    /// are logged inside.
    pub fn send(&self, channel_id: &str, args: Value) -> Result<(), RemoteError> {
        match self.lookup(channel_id, ChannelMode::FireAndForget)? {
            Entry::Listener { handler, .. } => {
                handler(args);
                Ok(())
            }
            Entry::Request { .. } => Err(wrong_mode(channel_id, ChannelMode::FireAndForget)),
        }
    }

    fn check_free(&self, channel: Channel, requested: ChannelMode) -> Result<(), RegistryError> {
        if channel.mode() != requested {
            return Err(RegistryError::ModeMismatch {
                channel,
                actual: channel.mode(),
                requested,
            });
        }
        if self.entries.contains_key(&channel) {
            warn!(channel = %channel, "duplicate registration rejected");
            return Err(RegistryError::AlreadyRegistered(channel));
        }
        Ok(())
    }

    fn lookup(&self, channel_id: &str, mode: ChannelMode) -> Result<&Entry, RemoteError> {
        let Some(channel) = Channel::from_id(channel_id) else {
            warn!(channel = channel_id, "call to unknown channel");
            return Err(RemoteError::new(
                ErrorCode::UnknownChannel,
                channel_id,
                "no such channel",
            ));
        };
        if channel.mode() != mode {
            return Err(wrong_mode(channel_id, mode));
        }
        self.entries.get(&channel).ok_or_else(|| {
            warn!(channel = channel_id, "call to channel with no handler");
            RemoteError::new(ErrorCode::NotRegistered, channel_id, "no handler registered")
        })
    }
}

fn wrong_mode(channel_id: &str, used: ChannelMode) -> RemoteError {
    let message = match used {
        ChannelMode::RequestResponse => "channel is fire-and-forget; use send",
        ChannelMode::FireAndForget => "channel is request-response; use invoke",
    };
    warn!(channel = channel_id, "{message}");
    RemoteError::new(ErrorCode::WrongMode, channel_id, message)
}
