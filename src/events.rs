//! Change notifications emitted after a mutation commits
//!
//! The coordinator calls a [`Notifier`] fire-and-forget. Delivery never
//! affects the outcome of the mutation that produced the event.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Article change events broadcast to connected clients
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArticleEvent {
    ArticleCreated {
        article_id: Uuid,
        title: String,
        version: i64,
    },

    ArticleUpdated {
        article_id: Uuid,
        title: String,
        version: i64,
    },

    AttachmentAdded {
        article_id: Uuid,
        filename: String,
        version: i64,
    },

    AttachmentRemoved {
        article_id: Uuid,
        filename: String,
        version: i64,
    },

    ArticleDeleted {
        article_id: Uuid,
    },
}

impl ArticleEvent {
    pub fn article_id(&self) -> Uuid {
        match self {
            ArticleEvent::ArticleCreated { article_id, .. }
            | ArticleEvent::ArticleUpdated { article_id, .. }
            | ArticleEvent::AttachmentAdded { article_id, .. }
            | ArticleEvent::AttachmentRemoved { article_id, .. }
            | ArticleEvent::ArticleDeleted { article_id } => *article_id,
        }
    }
}

/// Sink for article change events
pub trait Notifier: Send + Sync {
    fn notify(&self, event: ArticleEvent);
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _event: ArticleEvent) {}
}
