// Public API
pub use broker::{BrokerState, Disposition, SessionBroker};
pub use connection_manager::{ConnectionManager, InMemoryConnectionManager, OutboundSender};
pub use handler::{serve_connection, websocket_handler};
pub use messages::{
    ClientMessage, ConnectedPayload, GameEndPayload, JoinRoomPayload, LeaveRoomPayload,
    MatchWinner, MovePayload, PlayerInfo, ServerMessage, StartGamePayload, UpdateTurnPayload,
};
pub use socket::{Connection, SocketError, SocketWrapper};

// Internal modules
mod broker;
mod connection_manager;
mod handler;
mod messages;
mod socket;
