#![allow(dead_code)] // Test utilities may not all be used in every test

use tictactoe::websockets::{ClientMessage, JoinRoomPayload, LeaveRoomPayload, MovePayload};
use tictactoe::{ServerMessage, Symbol};

use super::setup::TestClient;

// ============================================================================
// Action Helpers
// ============================================================================

impl TestClient {
    /// Send a raw text frame, exactly as given
    pub fn send_raw(&self, frame: &str) {
        if let Some(to_server) = &self.to_server {
            to_server
                .send(frame.to_string())
                .expect("server side of the connection is gone");
        }
    }

    pub fn send(&self, message: ClientMessage) {
        self.send_raw(&serde_json::to_string(&message).unwrap());
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    pub fn join(&self, session_id: &str) {
        self.send(ClientMessage::JoinRoom(JoinRoomPayload {
            name: self.name.clone(),
            session_id: session_id.to_string(),
        }));
    }

    pub fn play(&self, cell_index: usize, symbol: Symbol) {
        self.send(ClientMessage::Move(MovePayload { cell_index, symbol }));
    }

    pub fn reset(&self) {
        self.send(ClientMessage::Reset);
    }

    pub fn leave(&self, session_id: &str) {
        self.send(ClientMessage::LeaveRoom(LeaveRoomPayload {
            name: Some(self.name.clone()),
            session_id: Some(session_id.to_string()),
        }));
    }

    /// Drop the transport and wait until the server finished tearing the connection down
    pub async fn disconnect(mut self) {
        self.to_server.take();
        self.wait_closed().await;
    }

    /// Wait for the server task behind this client to finish
    pub async fn wait_closed(&mut self) {
        if let Some(task) = self.task.take() {
            tokio::time::timeout(std::time::Duration::from_secs(1), task)
                .await
                .expect("connection did not shut down in time")
                .expect("connection task panicked");
        }
    }
}

/// Play one move and wait until both sides saw it, so the next move is judged against
/// the turn this one produced. Two connections are served by independent tasks, so
/// moves sent back to back can reach the room in either order.
pub async fn play_and_settle(
    mover: &mut TestClient,
    other: &mut TestClient,
    cell_index: usize,
    symbol: Symbol,
) {
    mover.play(cell_index, symbol);
    let expected = ServerMessage::moved(cell_index, symbol);
    mover.expect_message(expected.clone()).await;
    other.expect_message(expected).await;
}
