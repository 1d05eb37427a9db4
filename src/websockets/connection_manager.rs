use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::debug;

use super::messages::ServerMessage;

/// Outbound half of a connection: everything queued here is written to that socket in order
pub type OutboundSender = mpsc::UnboundedSender<ServerMessage>;

#[async_trait]
pub trait ConnectionManager: Send + Sync {
    async fn add_connection(&self, connection_id: String, sender: OutboundSender);

    async fn remove_connection(&self, connection_id: &str);

    async fn send_to_player(&self, connection_id: &str, message: &ServerMessage);

    async fn send_to_players(&self, connection_ids: &[String], message: &ServerMessage);
}

pub struct InMemoryConnectionManager {
    // connection id -> sender
    connections: Arc<RwLock<HashMap<String, OutboundSender>>>,
}

impl Default for InMemoryConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }
}

#[async_trait]
impl ConnectionManager for InMemoryConnectionManager {
    async fn add_connection(&self, connection_id: String, sender: OutboundSender) {
        let mut connections = self.connections.write().await;
        connections.insert(connection_id, sender);
    }

    async fn remove_connection(&self, connection_id: &str) {
        let mut connections = self.connections.write().await;
        connections.remove(connection_id);
    }

    async fn send_to_player(&self, connection_id: &str, message: &ServerMessage) {
        let connections = self.connections.read().await;
        if let Some(sender) = connections.get(connection_id) {
            if sender.send(message.clone()).is_err() {
                debug!(connection_id = %connection_id, "Dropped message for closed connection");
            }
        }
    }

    async fn send_to_players(&self, connection_ids: &[String], message: &ServerMessage) {
        let connections = self.connections.read().await;
        for connection_id in connection_ids {
            if let Some(sender) = connections.get(connection_id) {
                if sender.send(message.clone()).is_err() {
                    debug!(connection_id = %connection_id, "Dropped message for closed connection");
                }
            }
        }
    }
}
