//! Test assertion helpers for what a client sees on its socket
#![allow(dead_code)] // Test utilities may not all be used in every test

use std::sync::atomic::Ordering;
use tokio::time::{timeout, Duration};

use tictactoe::websockets::StartGamePayload;
use tictactoe::ServerMessage;

use super::setup::TestClient;

const RECEIVE_TIMEOUT: Duration = Duration::from_secs(1);
const QUIET_PERIOD: Duration = Duration::from_millis(50);

// ============================================================================
// Assertion Helpers
// ============================================================================

impl TestClient {
    /// Next frame from the server, decoded. Every frame must carry a timestamp.
    pub async fn next_message(&mut self) -> ServerMessage {
        let frame = timeout(RECEIVE_TIMEOUT, self.from_server.recv())
            .await
            .unwrap_or_else(|_| panic!("{} timed out waiting for a message", self.name))
            .unwrap_or_else(|| panic!("{} was disconnected while waiting for a message", self.name));

        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert!(
            value["meta"]["timestamp"].is_string(),
            "frame without meta.timestamp: {}",
            frame
        );

        serde_json::from_value(value).unwrap()
    }

    pub async fn expect_message(&mut self, expected: ServerMessage) {
        let received = self.next_message().await;
        assert_eq!(received, expected, "{} received the wrong message", self.name);
    }

    pub async fn expect_start_game(&mut self) -> StartGamePayload {
        match self.next_message().await {
            ServerMessage::StartGame(payload) => payload,
            other => panic!("{} expected startGame, got {:?}", self.name, other),
        }
    }

    pub async fn expect_no_message(&mut self) {
        if let Ok(Some(frame)) = timeout(QUIET_PERIOD, self.from_server.recv()).await {
            panic!("{} should not have received anything, got {}", self.name, frame);
        }
    }

    /// The server closed this connection on its own
    pub async fn expect_closed(&mut self) {
        self.wait_closed().await;
        assert!(
            self.closed.load(Ordering::SeqCst),
            "{}'s socket was not closed",
            self.name
        );
        assert!(self.from_server.recv().await.is_none());
    }
}
