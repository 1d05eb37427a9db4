#![allow(dead_code)] // Test utilities may not all be used in every test

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use tictactoe::{serve_connection, AppState, InMemoryConnectionManager, RoomRegistry, ServerMessage};

use super::mocks::MockSocket;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

/// A fresh server: its own registry and connection manager, no listener.
pub struct TestSetup {
    pub app_state: AppState,
    pub room_registry: Arc<RoomRegistry>,
    pub connection_manager: Arc<InMemoryConnectionManager>,
}

/// One simulated browser tab driving `serve_connection` through a [`MockSocket`]
pub struct TestClient {
    pub name: String,
    /// Connection id announced by the server in its first frame
    pub id: String,
    pub(super) to_server: Option<mpsc::UnboundedSender<String>>,
    pub(super) from_server: mpsc::UnboundedReceiver<String>,
    pub(super) closed: Arc<AtomicBool>,
    pub(super) task: Option<JoinHandle<()>>,
}

pub struct TestSetupBuilder {
    room_registry: Option<Arc<RoomRegistry>>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            room_registry: None,
        }
    }

    pub fn with_room_registry(mut self, room_registry: Arc<RoomRegistry>) -> Self {
        self.room_registry = Some(room_registry);
        self
    }

    pub fn build(self) -> TestSetup {
        let room_registry = self
            .room_registry
            .unwrap_or_else(|| Arc::new(RoomRegistry::new()));
        let connection_manager = Arc::new(InMemoryConnectionManager::new());
        let app_state = AppState::new(room_registry.clone(), connection_manager.clone());

        TestSetup {
            app_state,
            room_registry,
            connection_manager,
        }
    }
}

impl TestSetup {
    /// Open a new connection to the server and read the id it announces
    pub async fn connect(&self, name: &str) -> TestClient {
        let (to_server, inbound) = mpsc::unbounded_channel();
        let (outbound, from_server) = mpsc::unbounded_channel();
        let closed = Arc::new(AtomicBool::new(false));

        let socket = MockSocket::new(inbound, outbound, closed.clone());
        let task = tokio::spawn(serve_connection(Box::new(socket), self.app_state.clone()));

        let mut client = TestClient {
            name: name.to_string(),
            id: String::new(),
            to_server: Some(to_server),
            from_server,
            closed,
            task: Some(task),
        };
        client.id = match client.next_message().await {
            ServerMessage::Connected(payload) => payload.id,
            other => panic!("{} expected connected first, got {:?}", name, other),
        };
        client
    }

    pub async fn participant_count(&self, session_id: &str) -> Option<usize> {
        self.room_registry
            .snapshot(session_id)
            .await
            .map(|snapshot| snapshot.participant_count)
    }
}
