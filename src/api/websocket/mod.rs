//! WebSocket module for live article updates
//!
//! Provides the `/ws` endpoint that pushes every committed article change
//! to connected clients.
//!
//! ## Features
//! - One message per committed mutation
//! - Sequence ID tracking for gap detection
//! - `lagged` notice when a slow client misses events

pub mod broadcaster;
pub mod events;
pub mod handler;

pub use broadcaster::EventBroadcaster;
pub use events::{ClientMessage, WsMessage};
pub use handler::ws_handler;
