use actix_ws::Message;
use futures_util::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::notify::protocol::ServerEvent;
use crate::notify::server::{ConnectionId, NotificationServer};

/// Drives one notification WebSocket session: forwards registry events to
/// the client, answers pings, and unregisters on disconnect.
///
/// The feed is server-to-client only, so incoming text frames are dropped.
pub async fn handle_ws_session(
    mut session: actix_ws::Session,
    mut msg_stream: actix_ws::MessageStream,
    mut rx: mpsc::UnboundedReceiver<ServerEvent>,
    user_id: Uuid,
    connection_id: ConnectionId,
    notifications: Arc<NotificationServer>,
) {
    loop {
        tokio::select! {
            // Incoming frame from the WebSocket client.
            Some(msg) = msg_stream.next() => {
                match msg {
                    Ok(Message::Ping(bytes)) => {
                        if session.pong(&bytes).await.is_err() {
                            break;
                        }
                    }
                    Ok(Message::Close(_)) => {
                        break;
                    }
                    Err(_) => {
                        break;
                    }
                    _ => {}
                }
            }
            // Outgoing event from the registry to this client.
            Some(event) = rx.recv() => {
                let json = match serde_json::to_string(&event) {
                    Ok(j) => j,
                    Err(_) => continue,
                };
                if session.text(json).await.is_err() {
                    break;
                }
            }
            // Both channels closed — exit.
            else => break,
        }
    }

    // Clean up: drop this connection from the registry.
    notifications.unregister(user_id, connection_id).await;
    let _ = session.close(None).await;
}
