use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::notifications::{NotificationLevel, Toast};

/// Change notifications published by a session for the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    /// Tab strip contents, order, or logged-out flags changed.
    TabsChanged,
    ActiveChanged {
        active_id: Option<String>,
    },
    /// Split pair, split ratio, or shown grid changed.
    SplitChanged,
    /// The saved layout list changed (save, rename, delete).
    LayoutsChanged,
    LayoutApplied {
        layout_id: String,
    },
    LayoutStatus {
        level: NotificationLevel,
        message: String,
    },
    Toast {
        level: NotificationLevel,
        message: String,
    },
    #[serde(other)]
    Unknown,
}

impl From<Toast> for Event {
    fn from(toast: Toast) -> Self {
        Event::Toast {
            level: toast.level,
            message: toast.message,
        }
    }
}

pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn publish(&self, event: Event) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

/// A live subscription to an [`EventBus`]. Dropping it unsubscribes.
pub struct Subscription {
    receiver: broadcast::Receiver<Event>,
}

impl Subscription {
    /// Wait for the next event. Returns `None` once the bus is gone.
    ///
    /// A subscriber that falls behind skips the events it missed.
    pub async fn recv(&mut self) -> Option<Event> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Drain every event already queued without waiting.
    pub fn drain(&mut self) -> Vec<Event> {
        let mut out = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(event) => out.push(event),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
        out
    }
}
