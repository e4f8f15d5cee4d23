//! WebSocket connection handler

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::events::{ClientMessage, LaggedMessage, PongMessage, WelcomeMessage};
use crate::api::rest::ApiFailure;
use crate::api::state::AppState;

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct WsParams {
    /// Optional authentication token
    pub token: Option<String>,
}

/// WebSocket upgrade handler
///
/// Anonymous connections are accepted; a token, when given, must be valid.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    State(state): State<Arc<AppState>>,
) -> Response {
    if let Some(token) = params.token {
        if let Err(e) = state.jwt.validate_token(&token) {
            return ApiFailure::from(e).into_response();
        }
    }

    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection
async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let mut rx = state.broadcaster.subscribe();

    // Send welcome message with current sequence ID
    let welcome = WelcomeMessage::new(state.current_sequence_id());
    if !send_json(&mut socket, &welcome).await {
        return;
    }
    debug!("websocket client connected");

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(msg) => {
                        if !send_json(&mut socket, &msg).await {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(missed = n, "websocket client lagged");
                        if !send_json(&mut socket, &LaggedMessage::new(n)).await {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            result = socket.recv() => {
                match result {
                    Some(Ok(msg)) => {
                        if !handle_client_message(msg, &mut socket).await {
                            break;
                        }
                    }
                    Some(Err(_)) | None => break,
                }
            }
        }
    }

    debug!("websocket client disconnected");
}

/// Serialize and send; false once the client is gone
async fn send_json<T: serde::Serialize>(socket: &mut WebSocket, value: &T) -> bool {
    match serde_json::to_string(value) {
        Ok(json) => socket.send(Message::Text(json)).await.is_ok(),
        Err(e) => {
            warn!(error = %e, "failed to serialize websocket message");
            true
        }
    }
}

/// Handle a message from the client
/// Returns false if the connection should be closed
async fn handle_client_message(msg: Message, socket: &mut WebSocket) -> bool {
    match msg {
        Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
            Ok(ClientMessage::Ping) => send_json(socket, &PongMessage::default()).await,
            Err(_) => true,
        },
        Message::Binary(_) => true,
        Message::Ping(data) => socket.send(Message::Pong(data)).await.is_ok(),
        Message::Pong(_) => true,
        Message::Close(_) => false,
    }
}
