//! Frame transports.
//!
//! A transport is a pair of text queues: frames to send and frames
//! received. Both ends of the bridge speak through an [`Endpoint`]
//! regardless of what carries the text.

mod stdio;

pub use stdio::{line_delimited, stdio};

use tokio::sync::mpsc;

pub type FrameSender = mpsc::UnboundedSender<String>;
pub type FrameReceiver = mpsc::UnboundedReceiver<String>;

/// One side of a frame transport. Dropping `outgoing` closes the peer's
/// `incoming`.
#[derive(Debug)]
pub struct Endpoint {
    pub outgoing: FrameSender,
    pub incoming: FrameReceiver,
}

impl Endpoint {
    pub fn new(outgoing: FrameSender, incoming: FrameReceiver) -> Self {
        Self { outgoing, incoming }
    }

    pub fn split(self) -> (FrameSender, FrameReceiver) {
        (self.outgoing, self.incoming)
    }
}

/// In-process transport: `(host, client)`. Frames are delivered in send
/// order.
pub fn loopback() -> (Endpoint, Endpoint) {
    let (to_client, from_host) = mpsc::unbounded_channel();
    let (to_host, from_client) = mpsc::unbounded_channel();
    (
        Endpoint::new(to_client, from_client),
        Endpoint::new(to_host, from_host),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn loopback_preserves_order() {
        let (host, client) = loopback();
        let (host_tx, _host_rx) = host.split();
        let (_client_tx, mut client_rx) = client.split();

        for frame in ["a", "b", "c"] {
            host_tx.send(frame.to_string()).unwrap();
        }
        assert_eq!(client_rx.recv().await.unwrap(), "a");
        assert_eq!(client_rx.recv().await.unwrap(), "b");
        assert_eq!(client_rx.recv().await.unwrap(), "c");
    }

    #[tokio::test]
    async fn dropping_sender_closes_peer() {
        let (host, client) = loopback();
        drop(host);
        let (_tx, mut rx) = client.split();
        assert!(rx.recv().await.is_none());
    }
}
