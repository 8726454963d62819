//! Host-side event bus.
//!
//! Services publish [`HostEvent`]s here; the dispatcher turns the ones the
//! renderer cares about into push frames. Every subscriber gets its own
//! unbounded queue, so events are never dropped and each subscriber observes
//! them in publish order.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum HostEvent {
    WindowShown,
    MaximizeChanged(bool),
    ShortcutTriggered { id: String },
    WindowDestroyed,
    Shutdown,
}

pub struct EventBus {
    subscribers: Mutex<Vec<mpsc::UnboundedSender<HostEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<HostEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }
        rx
    }

    /// Deliver `event` to every live subscriber and return how many received
    /// it. Subscribers whose receiver was dropped are pruned.
    pub fn publish(&self, event: HostEvent) -> usize {
        let Ok(mut subs) = self.subscribers.lock() else {
            return 0;
        };
        subs.retain(|tx| tx.send(event.clone()).is_ok());
        subs.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
