use axum::{
    extract::{State, WebSocketUpgrade},
    response::Response,
};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::shared::AppState;

use super::broker::SessionBroker;
use super::messages::ServerMessage;
use super::socket::{Connection, SocketWrapper};

/// WebSocket endpoint. Connections are anonymous until they send `joinRoom`.
/// GET /ws
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
) -> Response {
    info!("WebSocket connection requested");

    ws.on_upgrade(move |socket| serve_connection(Box::new(socket), app_state))
}

/// Drive one client connection from upgrade to teardown
pub async fn serve_connection(socket: Box<dyn SocketWrapper>, app_state: AppState) {
    let connection_id = Uuid::new_v4().to_string();
    info!(connection_id = %connection_id, "WebSocket connection established");

    // Create the outbound channel (app -> client)
    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel::<ServerMessage>();

    app_state
        .connection_manager
        .add_connection(connection_id.clone(), outbound_sender)
        .await;

    // clients find themselves in the startGame roster by this id
    app_state
        .connection_manager
        .send_to_player(&connection_id, &ServerMessage::connected(&connection_id))
        .await;

    let broker = SessionBroker::new(
        connection_id.clone(),
        app_state.room_registry.clone(),
        app_state.connection_manager.clone(),
    );

    let (mut broker, result) = Connection::new(socket, outbound_receiver, broker)
        .run()
        .await;

    if let Err(e) = result {
        warn!(connection_id = %connection_id, error = %e, "WebSocket connection error");
    }

    broker.disconnect().await;

    app_state
        .connection_manager
        .remove_connection(&connection_id)
        .await;

    info!(connection_id = %connection_id, "WebSocket connection closed");
}
