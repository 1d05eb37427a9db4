use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::StreamExt;
use futures::SinkExt;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::broker::{Disposition, SessionBroker};
use super::messages::ServerMessage;

/// Simple WebSocket abstraction - all we care about is send/receive
#[async_trait]
pub trait SocketWrapper: Send {
    /// Send a text message to the client
    async fn send_message(&mut self, message: String) -> Result<(), SocketError>;

    /// Receive the next text message from the client (None if connection closed)
    async fn receive_message(&mut self) -> Result<Option<String>, SocketError>;

    /// Close the connection
    async fn close(&mut self) -> Result<(), SocketError>;
}

#[derive(Error, Debug)]
pub enum SocketError {
    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Receive failed: {0}")]
    ReceiveFailed(String),
}

/// Direct implementation on axum's WebSocket
#[async_trait]
impl SocketWrapper for WebSocket {
    async fn send_message(&mut self, message: String) -> Result<(), SocketError> {
        self.send(Message::Text(message))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }

    async fn receive_message(&mut self) -> Result<Option<String>, SocketError> {
        loop {
            match self.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Some(text)),
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                // axum answers pings itself; binary frames carry nothing we understand
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(SocketError::ReceiveFailed(e.to_string())),
            }
        }
    }

    async fn close(&mut self) -> Result<(), SocketError> {
        SinkExt::close(self)
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }
}

/// Connection represents a managed WebSocket connection.
///
/// Inbound frames go to the connection's [`SessionBroker`]; the outbound receiver is fed
/// by the ConnectionManager and written to the socket in queue order.
pub struct Connection {
    socket: Box<dyn SocketWrapper>,
    outbound_receiver: mpsc::UnboundedReceiver<ServerMessage>,
    broker: SessionBroker,
}

impl Connection {
    pub fn new(
        socket: Box<dyn SocketWrapper>,
        outbound_receiver: mpsc::UnboundedReceiver<ServerMessage>,
        broker: SessionBroker,
    ) -> Self {
        Self {
            socket,
            outbound_receiver,
            broker,
        }
    }

    /// Run the connection until either side closes it. The broker is handed back so
    /// the caller can release the room seat whatever the outcome.
    pub async fn run(mut self) -> (SessionBroker, Result<(), SocketError>) {
        let result = self.pump().await;

        if result.is_ok() {
            // flush whatever was queued before the close decision, e.g. roomFull
            while let Ok(message) = self.outbound_receiver.try_recv() {
                if self.deliver(message).await.is_err() {
                    break;
                }
            }
        }

        if let Err(e) = self.socket.close().await {
            debug!(connection_id = %self.broker.connection_id(), error = %e, "Close handshake failed");
        }

        (self.broker, result)
    }

    async fn pump(&mut self) -> Result<(), SocketError> {
        loop {
            tokio::select! {
                // Handle outbound messages (from our app to client)
                msg = self.outbound_receiver.recv() => {
                    match msg {
                        Some(message) => self.deliver(message).await?,
                        None => return Ok(()), // Channel closed, disconnect
                    }
                }

                // Handle inbound messages (from client to our app)
                msg = self.socket.receive_message() => {
                    match msg {
                        Ok(Some(text)) => {
                            if self.broker.handle_text(&text).await == Disposition::Close {
                                return Ok(());
                            }
                        }
                        Ok(None) => return Ok(()), // Client disconnected
                        Err(e) => return Err(e),
                    }
                }
            }
        }
    }

    async fn deliver(&mut self, message: ServerMessage) -> Result<(), SocketError> {
        self.broker.observe_outbound(&message);

        match message.to_frame_json() {
            Ok(frame) => self.socket.send_message(frame).await,
            Err(e) => {
                warn!(
                    connection_id = %self.broker.connection_id(),
                    error = %e,
                    "Failed to serialize outbound message"
                );
                Ok(())
            }
        }
    }
}
