//! Host side of a transport: turns incoming frames into registry calls.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use futures_util::future::BoxFuture;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::channel::{Channel, PushChannel};
use crate::protocol::{decode_client_frame, encode, ClientFrame, ErrorCode, HostFrame, RemoteError};
use crate::registry::{ChannelRegistry, RequestResult};
use crate::transport::{FrameReceiver, FrameSender};

/// A request waiting for its turn on a channel lane.
struct Call {
    id: u64,
    request: BoxFuture<'static, RequestResult>,
}

type Lanes = Arc<Mutex<HashMap<Channel, mpsc::UnboundedSender<Call>>>>;

/// Routes frames from one renderer to a [`ChannelRegistry`].
///
/// Frames are taken in arrival order. Listener calls run inline. Requests
/// on the same channel run one after another in arrival order, each
/// channel on its own task, so a slow dialog never blocks other channels.
/// Replies and pushes share one outgoing queue.
#[derive(Clone)]
pub struct BridgeServer {
    registry: Arc<ChannelRegistry>,
    outgoing: FrameSender,
    lanes: Lanes,
}

impl BridgeServer {
    pub fn new(registry: Arc<ChannelRegistry>, outgoing: FrameSender) -> Self {
        Self {
            registry,
            outgoing,
            lanes: Lanes::default(),
        }
    }

    /// Process frames until the renderer disconnects.
    pub async fn run(&self, mut incoming: FrameReceiver) {
        while let Some(raw) = incoming.recv().await {
            self.handle_frame(&raw);
        }
        debug!("renderer disconnected");
    }

    pub fn handle_frame(&self, raw: &str) {
        let frame = match decode_client_frame(raw) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "dropping malformed frame");
                if let Some(id) = e.invoke_id {
                    let channel = e.channel.unwrap_or_default();
                    self.reply(
                        id,
                        Err(RemoteError::new(ErrorCode::BadArguments, channel, e.reason)),
                    );
                }
                return;
            }
        };

        match frame {
            ClientFrame::Send { channel, args } => {
                if let Err(e) = self.registry.send(&channel, args) {
                    warn!(channel = %channel, code = %e.code, "fire-and-forget call dropped");
                }
            }
            ClientFrame::Invoke { id, channel, args } => {
                let request = self.registry.invoke(&channel, args);
                match Channel::from_id(&channel) {
                    Some(known) => self.enqueue(known, Call { id, request }),
                    // Routing failures are already resolved; nothing to order.
                    None => {
                        let server = self.clone();
                        tokio::spawn(async move {
                            let result = request.await;
                            server.reply(id, result);
                        });
                    }
                }
            }
        }
    }

    /// Send a push frame. Returns `false` once the renderer is gone.
    pub fn push(&self, channel: PushChannel, payload: Value) -> bool {
        self.send_frame(&HostFrame::push(channel.id(), payload))
    }

    fn enqueue(&self, channel: Channel, call: Call) {
        let mut lanes = self
            .lanes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let lane = lanes
            .entry(channel)
            .or_insert_with(|| spawn_lane(channel, self.outgoing.clone()));
        if let Err(mpsc::error::SendError(call)) = lane.send(call) {
            // The lane task ended with its receiver; start a fresh one.
            let fresh = spawn_lane(channel, self.outgoing.clone());
            let _ = fresh.send(call);
            *lane = fresh;
        }
    }

    fn reply(&self, id: u64, result: RequestResult) {
        self.send_frame(&HostFrame::reply(id, result));
    }

    fn send_frame(&self, frame: &HostFrame) -> bool {
        self.outgoing.send(encode(frame)).is_ok()
    }
}

/// Run the requests of one channel in the order they were queued. The lane
/// ends when the server is dropped or the renderer is gone.
fn spawn_lane(channel: Channel, outgoing: FrameSender) -> mpsc::UnboundedSender<Call> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Call>();
    tokio::spawn(async move {
        while let Some(Call { id, request }) = rx.recv().await {
            let result = request.await;
            if outgoing.send(encode(&HostFrame::reply(id, result))).is_err() {
                debug!(channel = %channel, "renderer gone, lane stopping");
                break;
            }
        }
    });
    tx
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::catalog::{storage, system};
    use crate::errors::HandlerError;
    use crate::transport;

    async fn replies(rx: &mut FrameReceiver, count: usize) -> Vec<Value> {
        let mut out = Vec::new();
        for _ in 0..count {
            let raw = tokio::time::timeout(Duration::from_secs(5), rx.recv())
                .await
                .unwrap()
                .unwrap();
            out.push(serde_json::from_str(&raw).unwrap());
        }
        out
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn same_channel_requests_run_in_arrival_order() {
        let log: Arc<Mutex<Vec<String>>> = Arc::default();
        let mut registry = ChannelRegistry::new();
        let sink = Arc::clone(&log);
        registry
            .register_request_handler::<storage::Set, _, _>(move |(key, value)| {
                let sink = Arc::clone(&sink);
                async move {
                    // Earlier calls sleep longer; only ordering keeps them first.
                    let n = value.as_u64().unwrap_or(0);
                    tokio::time::sleep(Duration::from_millis(40 - n * 4)).await;
                    sink.lock().unwrap().push(format!("{key}={n}"));
                    Ok::<_, HandlerError>(())
                }
            })
            .unwrap();

        let (host, client) = transport::loopback();
        let (host_out, host_in) = host.split();
        let server = BridgeServer::new(Arc::new(registry), host_out);
        tokio::spawn(async move { server.run(host_in).await });

        let (client_tx, mut client_rx) = client.split();
        for n in 1..=8u64 {
            let frame =
                json!({"type": "invoke", "id": n, "channel": "storage:set", "args": ["k", n]});
            client_tx.send(frame.to_string()).unwrap();
        }

        let ids: Vec<u64> = replies(&mut client_rx, 8)
            .await
            .iter()
            .map(|r| r["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());
        let expected: Vec<String> = (1..=8).map(|n| format!("k={n}")).collect();
        assert_eq!(*log.lock().unwrap(), expected);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn slow_channel_does_not_hold_up_others() {
        let started = Arc::new(AtomicUsize::new(0));
        let mut registry = ChannelRegistry::new();
        let counter = Arc::clone(&started);
        registry
            .register_request_handler::<system::ShowMessageBox, _, _>(move |(_opts,)| {
                counter.fetch_add(1, Ordering::SeqCst);
                async {
                    tokio::time::sleep(Duration::from_millis(300)).await;
                    Ok::<_, HandlerError>(capbridge_common::MessageBoxResult { response: 0 })
                }
            })
            .unwrap();
        registry
            .register_request_handler::<storage::Has, _, _>(|(_key,)| async {
                Ok::<_, HandlerError>(true)
            })
            .unwrap();

        let (host, client) = transport::loopback();
        let (host_out, host_in) = host.split();
        let server = BridgeServer::new(Arc::new(registry), host_out);
        tokio::spawn(async move { server.run(host_in).await });

        let (client_tx, mut client_rx) = client.split();
        let dialog = json!({
            "type": "invoke",
            "id": 1,
            "channel": "system:showMessageBox",
            "args": [{"message": "?"}]
        });
        let has = json!({"type": "invoke", "id": 2, "channel": "storage:has", "args": ["k"]});
        client_tx.send(dialog.to_string()).unwrap();
        client_tx.send(has.to_string()).unwrap();

        let order: Vec<u64> = replies(&mut client_rx, 2)
            .await
            .iter()
            .map(|r| r["id"].as_u64().unwrap())
            .collect();
        assert_eq!(order, vec![2, 1]);
        assert_eq!(started.load(Ordering::SeqCst), 1);
    }
}
