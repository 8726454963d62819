//! The host loop: frames in, replies and pushes out.

use std::sync::Arc;

use capbridge_common::HostEvent;
use capbridge_ipc::transport::{FrameReceiver, FrameSender};
use capbridge_ipc::{BridgeServer, ChannelRegistry, Endpoint, PushChannel};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::context::HostContext;

/// Serves one renderer connection.
///
/// Incoming frames are handled in arrival order. Host events that the
/// renderer subscribes to are turned into push frames on the same outgoing
/// queue as replies, so pushes keep the order their events were published in.
pub struct HostDispatcher {
    server: BridgeServer,
    events: mpsc::UnboundedReceiver<HostEvent>,
}

impl HostDispatcher {
    /// Subscribes to the context's events immediately; nothing published
    /// after this call is missed.
    pub fn new(ctx: &HostContext, registry: Arc<ChannelRegistry>, outgoing: FrameSender) -> Self {
        Self {
            server: BridgeServer::new(registry, outgoing),
            events: ctx.events().subscribe(),
        }
    }

    pub fn server(&self) -> &BridgeServer {
        &self.server
    }

    /// Run until the renderer disconnects or the host shuts down.
    pub async fn run(mut self, mut incoming: FrameReceiver) {
        loop {
            // Events first: pushes caused by a frame go out before the next
            // frame is looked at.
            tokio::select! {
                biased;
                event = self.events.recv() => match event {
                    Some(HostEvent::Shutdown) | None => {
                        debug!("host shutting down, dispatcher stopping");
                        break;
                    }
                    Some(event) => self.forward(event),
                },
                frame = incoming.recv() => match frame {
                    Some(raw) => self.server.handle_frame(&raw),
                    None => {
                        info!("renderer disconnected");
                        break;
                    }
                },
            }
        }
    }

    fn forward(&self, event: HostEvent) {
        if let Some((channel, payload)) = push_for(&event) {
            if !self.server.push(channel, payload) {
                debug!(channel = %channel.id(), "push dropped, renderer gone");
            }
        }
    }
}

/// The push frame a host event becomes, if the renderer cares about it.
pub fn push_for(event: &HostEvent) -> Option<(PushChannel, Value)> {
    match event {
        HostEvent::MaximizeChanged(maximized) => {
            Some((PushChannel::MaximizeChange, Value::Bool(*maximized)))
        }
        HostEvent::ShortcutTriggered { id } => {
            Some((PushChannel::ShortcutTriggered, Value::String(id.clone())))
        }
        HostEvent::WindowShown | HostEvent::WindowDestroyed | HostEvent::Shutdown => None,
    }
}

/// Build the registry for `ctx` and serve `endpoint` until it closes.
pub async fn serve(
    ctx: &HostContext,
    endpoint: Endpoint,
) -> Result<(), capbridge_ipc::RegistryError> {
    let registry = Arc::new(ctx.build_registry()?);
    let (outgoing, incoming) = endpoint.split();
    HostDispatcher::new(ctx, registry, outgoing).run(incoming).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maximize_and_shortcut_events_become_pushes() {
        assert_eq!(
            push_for(&HostEvent::MaximizeChanged(true)),
            Some((PushChannel::MaximizeChange, Value::Bool(true)))
        );
        assert_eq!(
            push_for(&HostEvent::ShortcutTriggered { id: "search".into() }),
            Some((PushChannel::ShortcutTriggered, Value::String("search".into())))
        );
    }

    #[test]
    fn lifecycle_events_stay_on_the_host() {
        assert_eq!(push_for(&HostEvent::WindowShown), None);
        assert_eq!(push_for(&HostEvent::WindowDestroyed), None);
        assert_eq!(push_for(&HostEvent::Shutdown), None);
    }
}
