//! HTTP and WebSocket surface
//!
//! REST endpoints under `/api`, uploaded files under `/uploads` and live
//! change notifications on `/ws`.

pub mod http;
pub mod rest;
pub mod state;
pub mod websocket;

pub use http::create_router;
pub use state::AppState;
