use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::catalog::{ListenerChannel, RequestChannel};
use crate::channel::{Channel, PushChannel};
use crate::protocol::{
    decode_host_frame, encode, encode_args, ClientFrame, ErrorCode, HostFrame, RemoteError,
};
use crate::transport::{Endpoint, FrameReceiver, FrameSender};

type PushCallback = Arc<dyn Fn(&Value) + Send + Sync>;
type Waiter = oneshot::Sender<Result<Option<Value>, RemoteError>>;

#[derive(Default)]
struct State {
    pending: HashMap<u64, (Channel, Waiter)>,
    listeners: HashMap<PushChannel, Vec<PushCallback>>,
    closed: bool,
}

struct Shared {
    outgoing: FrameSender,
    next_id: AtomicU64,
    state: Arc<Mutex<State>>,
}

/// Renderer side of a transport.
///
/// Matches replies to pending calls by id and fans push frames out to
/// subscribers in arrival order. When the transport closes every pending
/// call resolves with `transport_closed`, and later calls fail immediately.
#[derive(Clone)]
pub struct ClientConnection {
    shared: Arc<Shared>,
}

impl ClientConnection {
    /// Start reading from `endpoint`. Must be called inside a tokio runtime.
    pub fn connect(endpoint: Endpoint) -> Self {
        let (outgoing, incoming) = endpoint.split();
        let state = Arc::new(Mutex::new(State::default()));
        tokio::spawn(read_frames(incoming, Arc::clone(&state)));
        Self {
            shared: Arc::new(Shared {
                outgoing,
                next_id: AtomicU64::new(1),
                state,
            }),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.shared
            .state
            .lock()
            .map(|s| s.closed)
            .unwrap_or(true)
    }

    pub(crate) async fn request<C: RequestChannel>(
        &self,
        args: C::Args,
    ) -> Result<C::Output, RemoteError> {
        let channel = C::CHANNEL;
        let args = encode_args(&args)
            .map_err(|e| RemoteError::new(ErrorCode::BadArguments, channel.id(), e.to_string()))?;

        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        {
            let mut state = self.lock_state(channel)?;
            if state.closed {
                return Err(RemoteError::transport_closed(channel.id()));
            }
            state.pending.insert(id, (channel, tx));
        }

        let frame = encode(&ClientFrame::Invoke {
            id,
            channel: channel.id().to_string(),
            args,
        });
        if self.shared.outgoing.send(frame).is_err() {
            if let Ok(mut state) = self.shared.state.lock() {
                state.pending.remove(&id);
            }
            return Err(RemoteError::transport_closed(channel.id()));
        }

        let value = rx
            .await
            .unwrap_or_else(|_| Err(RemoteError::transport_closed(channel.id())))?;
        C::decode_output(value).map_err(|e| {
            RemoteError::new(
                ErrorCode::HandlerFailed,
                channel.id(),
                format!("unexpected reply: {e}"),
            )
        })
    }

    pub(crate) fn notify<C: ListenerChannel>(&self, args: C::Args) -> Result<(), RemoteError> {
        let channel = C::CHANNEL;
        let args = encode_args(&args)
            .map_err(|e| RemoteError::new(ErrorCode::BadArguments, channel.id(), e.to_string()))?;
        let frame = encode(&ClientFrame::Send {
            channel: channel.id().to_string(),
            args,
        });
        self.shared
            .outgoing
            .send(frame)
            .map_err(|_| RemoteError::transport_closed(channel.id()))
    }

    pub(crate) fn subscribe<F>(&self, channel: PushChannel, callback: F)
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        if let Ok(mut state) = self.shared.state.lock() {
            state
                .listeners
                .entry(channel)
                .or_default()
                .push(Arc::new(callback));
        }
    }

    fn lock_state(&self, channel: Channel) -> Result<MutexGuard<'_, State>, RemoteError> {
        self.shared
            .state
            .lock()
            .map_err(|_| RemoteError::transport_closed(channel.id()))
    }
}

async fn read_frames(mut incoming: FrameReceiver, state: Arc<Mutex<State>>) {
    while let Some(raw) = incoming.recv().await {
        match decode_host_frame(&raw) {
            Ok(HostFrame::Reply {
                id,
                ok,
                value,
                error,
            }) => {
                let waiter = state.lock().ok().and_then(|mut s| s.pending.remove(&id));
                let Some((channel, waiter)) = waiter else {
                    warn!(id, "reply for unknown call dropped");
                    continue;
                };
                let result = if ok {
                    Ok(value)
                } else {
                    Err(error.unwrap_or_else(|| {
                        RemoteError::new(ErrorCode::HandlerFailed, channel.id(), "call failed")
                    }))
                };
                // The caller may have stopped waiting.
                let _ = waiter.send(result);
            }
            Ok(HostFrame::Push { channel, payload }) => {
                let Some(push) = PushChannel::from_id(&channel) else {
                    warn!(channel = %channel, "push on unknown channel dropped");
                    continue;
                };
                let callbacks: Vec<PushCallback> = state
                    .lock()
                    .ok()
                    .and_then(|s| s.listeners.get(&push).cloned())
                    .unwrap_or_default();
                for callback in callbacks {
                    callback(&payload);
                }
            }
            Err(e) => warn!(error = %e, "malformed host frame dropped"),
        }
    }

    debug!("transport closed; failing pending calls");
    let drained: Vec<(Channel, Waiter)> = match state.lock() {
        Ok(mut s) => {
            s.closed = true;
            s.pending.drain().map(|(_, entry)| entry).collect()
        }
        Err(_) => Vec::new(),
    };
    for (channel, waiter) in drained {
        let _ = waiter.send(Err(RemoteError::transport_closed(channel.id())));
    }
}
