use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;

use crate::auth::jwt;
use crate::auth::middleware::JwtSecret;
use crate::notify::server::NotificationServer;
use crate::notify::session::handle_ws_session;

/// Query params for the WebSocket handshake endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct WsQuery {
    pub token: String,
}

/// GET /api/notifications/ws?token=<jwt>
///
/// Upgrades the HTTP connection to a WebSocket and registers it for the
/// authenticated user's own events. Authenticates via query param token
/// (browsers can't send Authorization headers during the WebSocket
/// handshake). A connection can only listen for its own identity — the
/// user id comes from the token, never from the client.
pub async fn ws_connect(
    req: HttpRequest,
    stream: web::Payload,
    query: web::Query<WsQuery>,
    secret: web::Data<JwtSecret>,
    notifications: web::Data<Arc<NotificationServer>>,
) -> Result<HttpResponse, actix_web::Error> {
    // 1. Validate the JWT.
    let claims = jwt::validate_token(&query.token, &secret.0)
        .map_err(|e| actix_web::error::ErrorUnauthorized(format!("Invalid token: {e}")))?;

    let user_id = claims
        .user_id()
        .map_err(actix_web::error::ErrorUnauthorized)?;

    // 2. Upgrade to WebSocket.
    let (response, session, msg_stream) = actix_ws::handle(&req, stream)?;

    // 3. Register the connection and get a receiver for outgoing events.
    let (connection_id, rx) = notifications.register(user_id).await;

    // 4. Spawn the WebSocket session task.
    let notifications_clone = notifications.get_ref().clone();

    actix_web::rt::spawn(handle_ws_session(
        session,
        msg_stream,
        rx,
        user_id,
        connection_id,
        notifications_clone,
    ));

    Ok(response)
}
