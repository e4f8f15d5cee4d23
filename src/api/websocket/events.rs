//! WebSocket wire messages

use serde::{Deserialize, Serialize};

use crate::events::ArticleEvent;

/// WebSocket message wrapper with metadata
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WsMessage {
    /// The article event
    #[serde(flatten)]
    pub event: ArticleEvent,

    /// Monotonically increasing sequence ID for gap detection
    pub sequence_id: u64,

    /// Unix timestamp when event was created
    pub timestamp: i64,
}

/// Client message types
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Ping for heartbeat
    Ping,
}

/// Welcome message sent on connection
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub current_sequence_id: u64,
}

impl WelcomeMessage {
    pub fn new(current_sequence_id: u64) -> Self {
        Self {
            msg_type: "connected".to_string(),
            current_sequence_id,
        }
    }
}

/// Pong response message
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PongMessage {
    #[serde(rename = "type")]
    pub msg_type: String,
}

impl Default for PongMessage {
    fn default() -> Self {
        Self {
            msg_type: "pong".to_string(),
        }
    }
}

/// Sent when a client fell behind the broadcast buffer
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LaggedMessage {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub missed: u64,
    pub message: String,
}

impl LaggedMessage {
    pub fn new(missed: u64) -> Self {
        Self {
            msg_type: "lagged".to_string(),
            missed,
            message: format!("Missed {} events, please refresh", missed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_ws_message_serialization() {
        let msg = WsMessage {
            event: ArticleEvent::ArticleUpdated {
                article_id: Uuid::nil(),
                title: "Notes".to_string(),
                version: 2,
            },
            sequence_id: 42,
            timestamp: 1234567890,
        };

        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"article_updated\""));
        assert!(json.contains("\"sequence_id\":42"));
    }

    #[test]
    fn test_client_message_parsing() {
        let json = r#"{"type":"ping"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));
    }

    #[test]
    fn test_lagged_message() {
        let json = serde_json::to_string(&LaggedMessage::new(7)).unwrap();
        assert!(json.contains("\"type\":\"lagged\""));
        assert!(json.contains("\"missed\":7"));
    }
}
