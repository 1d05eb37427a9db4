// Library crate for the tic-tac-toe room server
// This file exposes the public API for integration tests

pub mod config;
pub mod game;
pub mod room;
pub mod shared;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use config::{Config, ConfigError};
pub use game::{GameState, MoveRejection, Outcome, Symbol};
pub use room::{Participant, Room, RoomError, RoomRegistry};
pub use shared::{AppError, AppState};
pub use websockets::{
    serve_connection, websocket_handler, ClientMessage, ConnectionManager,
    InMemoryConnectionManager, ServerMessage, SessionBroker, SocketWrapper,
};

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the application router around an already constructed state
pub fn app(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "ok" }))
        .route("/ws", get(websocket_handler))
        .route("/rooms/:session_id", get(room::room_availability))
        .fallback(|| async { AppError::NotFound("No such route".to_string()) })
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
