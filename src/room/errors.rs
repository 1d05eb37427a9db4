use thiserror::Error;

use crate::game::MoveRejection;

/// Reasons a room operation is declined. None of them end the connection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoomError {
    #[error("Room is full")]
    RoomFull,

    #[error("Invalid move: {0}")]
    InvalidMove(#[from] MoveRejection),

    #[error("Room not found: {0}")]
    RoomNotFound(String),

    #[error("Connection has not joined a room")]
    SessionUnjoined,
}
