//! WebSocket event broadcaster
//!
//! Implements [`Notifier`] so the coordinator can publish committed changes
//! without knowing about WebSocket clients.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::broadcast;
use tracing::debug;

use super::events::WsMessage;
use crate::events::{ArticleEvent, Notifier};

/// Event broadcaster for WebSocket notifications
pub struct EventBroadcaster {
    tx: broadcast::Sender<WsMessage>,
    sequence_counter: AtomicU64,
}

impl EventBroadcaster {
    /// Create a new broadcaster with the given capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            sequence_counter: AtomicU64::new(0),
        }
    }

    /// Broadcast an event to all connected WebSocket clients
    pub fn broadcast(&self, event: ArticleEvent) {
        let seq = self.sequence_counter.fetch_add(1, Ordering::SeqCst);
        let msg = WsMessage {
            event,
            sequence_id: seq,
            timestamp: chrono::Utc::now().timestamp(),
        };
        if self.tx.send(msg).is_err() {
            debug!(sequence_id = seq, "no websocket subscribers");
        }
    }

    /// Get the current sequence ID
    pub fn current_sequence_id(&self) -> u64 {
        self.sequence_counter.load(Ordering::SeqCst)
    }

    /// Subscribe to receive broadcast events
    pub fn subscribe(&self) -> broadcast::Receiver<WsMessage> {
        self.tx.subscribe()
    }
}

impl Notifier for EventBroadcaster {
    fn notify(&self, event: ArticleEvent) {
        self.broadcast(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_broadcaster_sequence_increment() {
        let broadcaster = EventBroadcaster::new(100);
        assert_eq!(broadcaster.current_sequence_id(), 0);

        broadcaster.broadcast(ArticleEvent::ArticleDeleted {
            article_id: Uuid::new_v4(),
        });

        assert_eq!(broadcaster.current_sequence_id(), 1);
    }

    #[tokio::test]
    async fn test_subscriber_receives_notified_events() {
        let broadcaster = EventBroadcaster::new(16);
        let mut rx = broadcaster.subscribe();
        let article_id = Uuid::new_v4();

        broadcaster.notify(ArticleEvent::ArticleCreated {
            article_id,
            title: "Notes".to_string(),
            version: 1,
        });

        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.sequence_id, 0);
        assert_eq!(msg.event.article_id(), article_id);
    }
}
