use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::game::{Symbol, WinTally};
use crate::room::{MatchResult, Participant};

/// Client -> Server messages.
///
/// Frames look like `{"type": "move", "payload": {"index": 4, "value": "X"}}`; `reset`
/// carries no payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum ClientMessage {
    JoinRoom(JoinRoomPayload),
    Move(MovePayload),
    Reset,
    LeaveRoom(LeaveRoomPayload),
}

/// Server -> Client messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum ServerMessage {
    /// First frame on every connection: the id this client appears under in `startGame`
    Connected(ConnectedPayload),
    RoomFull,
    WaitingForOpponent,
    StartGame(StartGamePayload),
    Move(MovePayload),
    UpdateTurn(UpdateTurnPayload),
    GameEnd(GameEndPayload),
    Reset,
    /// Display name of the participant who left
    UserLeft(String),
    /// Free-form notice, e.g. someone joining
    Message(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRoomPayload {
    pub name: String,
    #[serde(rename = "room")]
    pub session_id: String,
}

/// Sent by the client on leave; the server relies on the connection's own binding instead
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRoomPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "room", default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovePayload {
    #[serde(rename = "index", deserialize_with = "deserialize_cell_index")]
    pub cell_index: usize,
    #[serde(rename = "value")]
    pub symbol: Symbol,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedPayload {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub name: String,
    pub id: String,
    pub symbol: Symbol,
}

impl From<&Participant> for PlayerInfo {
    fn from(participant: &Participant) -> Self {
        Self {
            name: participant.display_name.clone(),
            id: participant.connection_id.clone(),
            symbol: participant.symbol,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartGamePayload {
    pub players: Vec<PlayerInfo>,
    #[serde(rename = "startingPlayer")]
    pub opening_turn: Symbol,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTurnPayload {
    #[serde(rename = "currentPlayer")]
    pub turn: Symbol,
}

/// Winner column of `gameEnd`: a symbol or `"Draw"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchWinner {
    X,
    O,
    Draw,
}

impl From<Option<Symbol>> for MatchWinner {
    fn from(winner: Option<Symbol>) -> Self {
        match winner {
            Some(Symbol::X) => MatchWinner::X,
            Some(Symbol::O) => MatchWinner::O,
            None => MatchWinner::Draw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEndPayload {
    pub winner: MatchWinner,
    pub player_x_name: String,
    pub player_o_name: String,
    pub player_x_wins: u32,
    pub player_o_wins: u32,
}

impl From<MatchResult> for GameEndPayload {
    fn from(result: MatchResult) -> Self {
        let WinTally { x, o } = result.win_counts;
        Self {
            winner: result.winner.into(),
            player_x_name: result.player_x_name,
            player_o_name: result.player_o_name,
            player_x_wins: x,
            player_o_wins: o,
        }
    }
}

/// Metadata attached to every outbound frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageMeta {
    pub timestamp: DateTime<Utc>,
}

/// Outbound wire frame: the message's `type`/`payload` plus `meta`
#[derive(Debug, Serialize)]
pub struct ServerFrame<'a> {
    #[serde(flatten)]
    pub message: &'a ServerMessage,
    pub meta: MessageMeta,
}

impl ServerMessage {
    /// Serialize with a fresh timestamp
    pub fn to_frame_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&ServerFrame {
            message: self,
            meta: MessageMeta {
                timestamp: Utc::now(),
            },
        })
    }

    pub fn connected(connection_id: &str) -> Self {
        ServerMessage::Connected(ConnectedPayload {
            id: connection_id.to_string(),
        })
    }

    /// Create a START_GAME message from the room roster
    pub fn start_game(participants: &[Participant], opening_turn: Symbol) -> Self {
        ServerMessage::StartGame(StartGamePayload {
            players: participants.iter().map(PlayerInfo::from).collect(),
            opening_turn,
        })
    }

    pub fn moved(cell_index: usize, symbol: Symbol) -> Self {
        ServerMessage::Move(MovePayload { cell_index, symbol })
    }

    pub fn update_turn(turn: Symbol) -> Self {
        ServerMessage::UpdateTurn(UpdateTurnPayload { turn })
    }

    pub fn game_end(result: MatchResult) -> Self {
        ServerMessage::GameEnd(result.into())
    }

    pub fn joined_notice(display_name: &str) -> Self {
        ServerMessage::Message(format!("{} has joined the room", display_name))
    }
}

/// Browsers send the cell index as read from a DOM attribute, so accept `4` and `"4"`.
fn deserialize_cell_index<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawIndex {
        Number(usize),
        Text(String),
    }

    match RawIndex::deserialize(deserializer)? {
        RawIndex::Number(index) => Ok(index),
        RawIndex::Text(text) => text
            .trim()
            .parse::<usize>()
            .map_err(|e| serde::de::Error::custom(format!("invalid cell index {:?}: {}", text, e))),
    }
}
