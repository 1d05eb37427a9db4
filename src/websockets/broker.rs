use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::{
    game::{MoveRejection, Symbol},
    room::{LeaveRoomResult, MoveResolution, RoomError, RoomRegistry},
    websockets::{
        connection_manager::ConnectionManager,
        messages::{ClientMessage, JoinRoomPayload, LeaveRoomPayload, MovePayload, ServerMessage},
    },
};

/// Where a connection stands in its room's lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrokerState {
    Unjoined,
    Waiting { session_id: String },
    Active { session_id: String },
    Terminated,
}

impl BrokerState {
    pub fn session_id(&self) -> Option<&str> {
        match self {
            BrokerState::Waiting { session_id } | BrokerState::Active { session_id } => {
                Some(session_id)
            }
            BrokerState::Unjoined | BrokerState::Terminated => None,
        }
    }
}

/// Whether the transport should stay open after a message was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    KeepOpen,
    Close,
}

/// Per-connection handler: owns the connection's state and routes its messages into
/// its room. Every broadcast is queued while the room is still locked, so both
/// participants see room changes in the order they were accepted.
pub struct SessionBroker {
    connection_id: String,
    state: BrokerState,
    room_registry: Arc<RoomRegistry>,
    connection_manager: Arc<dyn ConnectionManager>,
}

impl SessionBroker {
    pub fn new(
        connection_id: String,
        room_registry: Arc<RoomRegistry>,
        connection_manager: Arc<dyn ConnectionManager>,
    ) -> Self {
        Self {
            connection_id,
            state: BrokerState::Unjoined,
            room_registry,
            connection_manager,
        }
    }

    pub fn connection_id(&self) -> &str {
        &self.connection_id
    }

    pub fn state(&self) -> &BrokerState {
        &self.state
    }

    /// Parse a raw text frame and dispatch it. Frames that fail validation are dropped.
    pub async fn handle_text(&mut self, text: &str) -> Disposition {
        match serde_json::from_str::<ClientMessage>(text) {
            Ok(message) => self.handle_message(message).await,
            Err(e) => {
                warn!(
                    connection_id = %self.connection_id,
                    error = %e,
                    "Failed to parse WebSocket message"
                );
                self.disposition()
            }
        }
    }

    pub async fn handle_message(&mut self, message: ClientMessage) -> Disposition {
        debug!(
            connection_id = %self.connection_id,
            state = ?self.state,
            message = ?message,
            "Received message"
        );

        match (self.state.clone(), message) {
            (BrokerState::Terminated, _) => Disposition::Close,

            (BrokerState::Unjoined, ClientMessage::JoinRoom(payload)) => self.join(payload).await,
            (BrokerState::Unjoined, ClientMessage::LeaveRoom(_)) => {
                self.state = BrokerState::Terminated;
                Disposition::Close
            }
            (BrokerState::Unjoined, other) => {
                self.decline(&RoomError::SessionUnjoined, &other);
                Disposition::KeepOpen
            }

            (_, ClientMessage::JoinRoom(payload)) => {
                debug!(
                    connection_id = %self.connection_id,
                    requested_room = %payload.session_id,
                    "Ignoring join from a connection that already joined"
                );
                Disposition::KeepOpen
            }
            // the room itself turns moves away until both seats are taken
            (
                BrokerState::Waiting { session_id } | BrokerState::Active { session_id },
                ClientMessage::Move(payload),
            ) => {
                self.submit_move(&session_id, payload).await;
                Disposition::KeepOpen
            }
            (
                BrokerState::Waiting { session_id } | BrokerState::Active { session_id },
                ClientMessage::Reset,
            ) => {
                self.reset(&session_id).await;
                Disposition::KeepOpen
            }
            (_, ClientMessage::LeaveRoom(payload)) => {
                self.leave(Some(payload)).await;
                Disposition::Close
            }
        }
    }

    /// Track room-wide transitions announced to this connection by the other side
    pub fn observe_outbound(&mut self, message: &ServerMessage) {
        match (&self.state, message) {
            (BrokerState::Waiting { session_id }, ServerMessage::StartGame(_)) => {
                self.state = BrokerState::Active {
                    session_id: session_id.clone(),
                };
            }
            (BrokerState::Active { session_id }, ServerMessage::UserLeft(_)) => {
                self.state = BrokerState::Waiting {
                    session_id: session_id.clone(),
                };
            }
            _ => {}
        }
    }

    /// Transport went away. Safe to call any number of times.
    pub async fn disconnect(&mut self) {
        if self.state == BrokerState::Terminated {
            return;
        }
        info!(connection_id = %self.connection_id, state = ?self.state, "Connection disconnected");
        self.leave(None).await;
    }

    #[instrument(skip(self, payload), fields(connection_id = %self.connection_id, room_id = %payload.session_id))]
    async fn join(&mut self, payload: JoinRoomPayload) -> Disposition {
        let JoinRoomPayload { name, session_id } = payload;

        let (participant, mut room) = match self
            .room_registry
            .join_room(&session_id, &self.connection_id, &name)
            .await
        {
            Ok(joined) => joined,
            Err(RoomError::RoomFull) => {
                info!("Room is full, turning connection away");
                self.connection_manager
                    .send_to_player(&self.connection_id, &ServerMessage::RoomFull)
                    .await;
                return Disposition::Close;
            }
            Err(e) => {
                warn!(error = %e, "Join failed");
                return Disposition::KeepOpen;
            }
        };

        if room.is_full() {
            let opening_turn = room.request_reset();
            let start = ServerMessage::start_game(room.participants(), opening_turn);
            self.connection_manager
                .send_to_players(&room.connection_ids(), &start)
                .await;
            self.state = BrokerState::Active {
                session_id: session_id.clone(),
            };
            info!(opening_turn = %opening_turn, "Both seats taken, game started");
        } else {
            self.connection_manager
                .send_to_player(&self.connection_id, &ServerMessage::WaitingForOpponent)
                .await;
            self.state = BrokerState::Waiting {
                session_id: session_id.clone(),
            };
            info!(symbol = %participant.symbol, "Waiting for opponent");
        }

        let others: Vec<String> = room
            .connection_ids()
            .into_iter()
            .filter(|id| id != &self.connection_id)
            .collect();
        self.connection_manager
            .send_to_players(&others, &ServerMessage::joined_notice(&participant.display_name))
            .await;

        Disposition::KeepOpen
    }

    #[instrument(skip(self), fields(connection_id = %self.connection_id))]
    async fn submit_move(&mut self, session_id: &str, payload: MovePayload) {
        let mut room = match self.room_registry.lock_room(session_id).await {
            Ok(room) => room,
            Err(e) => {
                self.decline(&e, &ClientMessage::Move(payload));
                return;
            }
        };

        let outcome = match room.submit_move(&self.connection_id, payload.cell_index, payload.symbol)
        {
            Ok(outcome) => outcome,
            Err(e) => {
                self.decline(&e, &ClientMessage::Move(payload));
                return;
            }
        };

        let targets = room.connection_ids();
        self.connection_manager
            .send_to_players(
                &targets,
                &ServerMessage::moved(outcome.cell_index, outcome.symbol),
            )
            .await;

        match outcome.resolution {
            MoveResolution::Continue { next_turn } => {
                self.connection_manager
                    .send_to_players(&targets, &ServerMessage::update_turn(next_turn))
                    .await;
            }
            MoveResolution::Finished(result) => {
                info!(
                    room_id = %session_id,
                    winner = ?result.winner,
                    x_wins = result.win_counts.x,
                    o_wins = result.win_counts.o,
                    "Match finished"
                );
                self.connection_manager
                    .send_to_players(&targets, &ServerMessage::game_end(result))
                    .await;
            }
        }
    }

    #[instrument(skip(self), fields(connection_id = %self.connection_id))]
    async fn reset(&mut self, session_id: &str) {
        let mut room = match self.room_registry.lock_room(session_id).await {
            Ok(room) => room,
            Err(e) => {
                self.decline(&e, &ClientMessage::Reset);
                return;
            }
        };

        if room.participant(&self.connection_id).is_none() {
            self.decline(&MoveRejection::NotParticipant.into(), &ClientMessage::Reset);
            return;
        }

        let opening_turn: Symbol = room.request_reset();
        let targets = room.connection_ids();
        self.connection_manager
            .send_to_players(&targets, &ServerMessage::Reset)
            .await;
        self.connection_manager
            .send_to_players(&targets, &ServerMessage::update_turn(opening_turn))
            .await;

        info!(room_id = %session_id, opening_turn = %opening_turn, "Board reset");
    }

    async fn leave(&mut self, payload: Option<LeaveRoomPayload>) {
        let previous = std::mem::replace(&mut self.state, BrokerState::Terminated);
        let Some(session_id) = previous.session_id() else {
            return;
        };

        if let Some(requested) = payload.as_ref().and_then(|p| p.session_id.as_deref()) {
            if requested != session_id {
                warn!(
                    connection_id = %self.connection_id,
                    room_id = %session_id,
                    requested_room = %requested,
                    "Leave named a different room, leaving the joined one"
                );
            }
        }

        match self
            .room_registry
            .leave_room(session_id, &self.connection_id)
            .await
        {
            Ok(LeaveRoomResult::Left { departed, room }) => {
                self.connection_manager
                    .send_to_players(
                        &room.connection_ids(),
                        &ServerMessage::UserLeft(departed.display_name.clone()),
                    )
                    .await;
                info!(
                    connection_id = %self.connection_id,
                    room_id = %session_id,
                    name = %departed.display_name,
                    "Participant left, opponent notified"
                );
            }
            Ok(LeaveRoomResult::RoomDeleted { departed }) => {
                info!(
                    connection_id = %self.connection_id,
                    room_id = %session_id,
                    name = %departed.display_name,
                    "Last participant left, room released"
                );
            }
            Ok(LeaveRoomResult::PlayerNotInRoom) => {
                debug!(connection_id = %self.connection_id, room_id = %session_id, "Connection was not in room");
            }
            Err(e) => {
                debug!(connection_id = %self.connection_id, room_id = %session_id, error = %e, "Leave found no room");
            }
        }
    }

    fn decline(&self, reason: &RoomError, message: &ClientMessage) {
        debug!(
            connection_id = %self.connection_id,
            state = ?self.state,
            reason = %reason,
            message = ?message,
            "Declined message"
        );
    }

    fn disposition(&self) -> Disposition {
        if self.state == BrokerState::Terminated {
            Disposition::Close
        } else {
            Disposition::KeepOpen
        }
    }
}
