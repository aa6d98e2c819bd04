//! WebSocket handler
//!
//! Handles WebSocket upgrade requests and the connection lifecycle: register
//! with the hub, greet the client, then forward broadcast events until
//! either side goes away.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use super::hub::LiveHub;
use super::messages::{ClientMessage, ServerMessage};
use crate::api::AppState;

/// WebSocket upgrade handler, mounted at `GET /api/v1/ws`.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    let hub = Arc::clone(&state.hub);
    ws.on_upgrade(move |socket| handle_socket(socket, hub))
}

/// Handle an established WebSocket connection
async fn handle_socket(socket: WebSocket, hub: Arc<LiveHub>) {
    let (mut sender, mut receiver) = socket.split();

    let (_guard, mut events) = match hub.register() {
        Ok(pair) => pair,
        Err(e) => {
            let _ = send_message(&mut sender, &ServerMessage::Error {
                message: e.to_string(),
            })
            .await;
            return;
        }
    };

    let connection_id = Uuid::new_v4().to_string();
    tracing::info!(connection_id = %connection_id, "WebSocket connected");

    let connected = ServerMessage::Connected {
        connection_id: connection_id.clone(),
    };
    if send_message(&mut sender, &connected).await.is_err() {
        return;
    }

    // One loop drives both directions: broadcast events flow out, client
    // messages flow in. Both recv calls are cancellation-safe.
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(msg) => {
                    if send_message(&mut sender, &msg).await.is_err() {
                        break;
                    }
                }
                // A lagged dashboard just skips ahead; only the newest
                // state matters to it.
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(connection_id = %connection_id, skipped, "WebSocket receiver lagged");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(ClientMessage::Ping) => {
                            if send_message(&mut sender, &ServerMessage::Pong).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            tracing::debug!(
                                connection_id = %connection_id,
                                error = %e,
                                "Invalid client message"
                            );
                            let reply = ServerMessage::Error {
                                message: format!("Invalid message format: {}", e),
                            };
                            if send_message(&mut sender, &reply).await.is_err() {
                                break;
                            }
                        }
                    }
                }
                Some(Ok(Message::Close(_))) => {
                    tracing::debug!(connection_id = %connection_id, "Client requested close");
                    break;
                }
                // Protocol-level ping/pong is handled by axum.
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::debug!(
                        connection_id = %connection_id,
                        error = %e,
                        "WebSocket receive error"
                    );
                    break;
                }
                None => break,
            },
        }
    }

    tracing::info!(connection_id = %connection_id, "WebSocket disconnected");
}

/// Serialize and send a single server message.
async fn send_message(
    sender: &mut SplitSink<WebSocket, Message>,
    message: &ServerMessage,
) -> Result<(), ()> {
    let text = serde_json::to_string(message).map_err(|e| {
        tracing::error!(error = %e, "Failed to serialize message");
    })?;
    sender.send(Message::Text(text)).await.map_err(|_| ())
}
