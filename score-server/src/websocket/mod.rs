use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, info, warn};
use warp::ws::{Message, WebSocket};

use crate::session::GameSession;
use score_types::{ClientMessage, ServerMessage};

pub mod connection;
pub mod handlers;


use connection::ConnectionId;
pub use connection::ConnectionManager;
use handlers::MessageHandler;

pub async fn handle_connection(
    websocket: WebSocket,
    connection_manager: Arc<ConnectionManager>,
    session: Arc<GameSession>,
) {
    let connection_id = ConnectionId::new();
    info!("New WebSocket connection: {}", connection_id);

    let (mut ws_sender, mut ws_receiver) = websocket.split();

    // Create connection and get receivers for replies and shared updates
    let mut replies = connection_manager.create_connection(connection_id).await;
    let (initial_view, mut updates) = session
        .view_with(|| connection_manager.subscribe_updates())
        .await;

    let message_handler =
        MessageHandler::new(connection_id, connection_manager.clone(), session.clone());

    if let Err(e) = connection_manager
        .send_to_connection(
            connection_id,
            ServerMessage::StateUpdate { view: initial_view },
        )
        .await
    {
        warn!("Failed to queue initial state for {}: {}", connection_id, e);
    }

    // Handle incoming messages
    let incoming_handler = {
        let message_handler = message_handler.clone();

        async move {
            while let Some(result) = ws_receiver.next().await {
                match result {
                    Ok(msg) if msg.is_close() => break,
                    Ok(msg) => {
                        if let Err(e) = handle_message(msg, &message_handler).await {
                            warn!("Rejected message from {}: {}", connection_id, e);
                            if message_handler.send_error(e).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(e) => {
                        warn!("WebSocket error for {}: {}", connection_id, e);
                        break;
                    }
                }
            }
        }
    };

    // Handle outgoing messages; replies first so the initial state leads
    let outgoing_handler = async move {
        loop {
            let message = tokio::select! {
                biased;
                reply = replies.recv() => match reply {
                    Some(message) => message,
                    None => break,
                },
                update = updates.recv() => match update {
                    Ok(message) => message,
                    Err(RecvError::Lagged(skipped)) => {
                        // A later update carries the full state anyway
                        debug!("Connection {} skipped {} updates", connection_id, skipped);
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                },
            };

            let json = match serde_json::to_string(&message) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize message: {:?}", e);
                    continue;
                }
            };

            if let Err(e) = ws_sender.send(Message::text(json)).await {
                warn!("Failed to send message to {}: {:?}", connection_id, e);
                break;
            }
        }

        let _ = ws_sender.close().await;
    };

    // Run both handlers concurrently. Once the connection is dropped from the
    // manager, the outgoing side ends first and no further message is applied.
    tokio::select! {
        biased;
        _ = outgoing_handler => {},
        _ = incoming_handler => {},
    }

    // Cleanup connection
    info!("Connection {} disconnected", connection_id);
    message_handler.handle_disconnect().await;
}

async fn handle_message(msg: Message, message_handler: &MessageHandler) -> Result<(), String> {
    // Only handle text messages
    if !msg.is_text() {
        return Ok(());
    }

    let text = msg.to_str().map_err(|_| "Invalid text message".to_string())?;

    // Parse client message
    let client_message: ClientMessage =
        serde_json::from_str(text).map_err(|e| format!("Invalid JSON message: {}", e))?;

    message_handler.handle_message(client_message).await
}
