use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, instrument};

use super::errors::RoomError;
use super::models::{Participant, Room};

/// Exclusive access to one room. Whoever holds it may mutate the room and fan out
/// the resulting messages before anyone else touches the same room.
pub type RoomGuard = OwnedMutexGuard<Room>;

type SharedRoom = Arc<Mutex<Room>>;

/// Result of removing a connection from its room
#[derive(Debug)]
pub enum LeaveRoomResult {
    /// Participant left, the room still has someone in it
    Left { departed: Participant, room: RoomGuard },
    /// Participant was the last one, the room is gone from the registry
    RoomDeleted { departed: Participant },
    /// Connection was not seated in the room
    PlayerNotInRoom,
}

/// Lightweight view of a room for availability checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSnapshot {
    pub session_id: String,
    pub participant_count: usize,
    pub is_full: bool,
}

/// Process-wide mapping from session id to room.
///
/// Every room sits behind its own mutex, so moves and resets only contend within a
/// room. The map lock is taken by joins and leaves, which creates and destroys rooms
/// in the same critical section as the admission or departure that caused it.
pub struct RoomRegistry {
    rooms: Mutex<HashMap<String, SharedRoom>>,
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomRegistry {
    /// Creates a registry with no rooms
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }

    /// Admits a connection to the room for `session_id`, creating the room on first use.
    ///
    /// On success the room stays locked in the returned guard so the caller can announce
    /// the admission before any other operation on the room runs. The map lock is only
    /// held to look the room up, never while waiting on the room itself.
    #[instrument(skip(self))]
    pub async fn join_room(
        &self,
        session_id: &str,
        connection_id: &str,
        display_name: &str,
    ) -> Result<(Participant, RoomGuard), RoomError> {
        loop {
            let shared = self.get_or_create(session_id).await;
            let mut room = Arc::clone(&shared).lock_owned().await;

            // the last participant may have left while we waited, taking the room with them
            if !self.is_registered(session_id, &shared).await {
                debug!(room_id = %session_id, connection_id = %connection_id, "Room was released while waiting, retrying join");
                continue;
            }

            return match room.admit(connection_id.to_string(), display_name.to_string()) {
                Ok(participant) => {
                    info!(
                        room_id = %session_id,
                        connection_id = %connection_id,
                        symbol = %participant.symbol,
                        participant_count = room.participant_count(),
                        "Participant joined room"
                    );
                    Ok((participant, room))
                }
                Err(e) => {
                    debug!(room_id = %session_id, connection_id = %connection_id, error = %e, "Join rejected");
                    Err(e)
                }
            };
        }
    }

    /// Removes a connection from its room and drops the room once nobody is left.
    #[instrument(skip(self))]
    pub async fn leave_room(
        &self,
        session_id: &str,
        connection_id: &str,
    ) -> Result<LeaveRoomResult, RoomError> {
        let shared = self
            .rooms
            .lock()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| RoomError::RoomNotFound(session_id.to_string()))?;

        let mut room = Arc::clone(&shared).lock_owned().await;
        let (departed, is_now_empty) = room.remove(connection_id);

        let Some(departed) = departed else {
            debug!(room_id = %session_id, connection_id = %connection_id, "Connection not in room");
            return Ok(LeaveRoomResult::PlayerNotInRoom);
        };

        if is_now_empty {
            // joiners already queued on this room will find it unregistered and start over
            let mut rooms = self.rooms.lock().await;
            if rooms
                .get(session_id)
                .is_some_and(|current| Arc::ptr_eq(current, &shared))
            {
                rooms.remove(session_id);
            }
            info!(room_id = %session_id, "Room is now empty, deleting");
            return Ok(LeaveRoomResult::RoomDeleted { departed });
        }

        info!(
            room_id = %session_id,
            connection_id = %connection_id,
            remaining = room.participant_count(),
            "Participant left room"
        );
        Ok(LeaveRoomResult::Left { departed, room })
    }

    /// Locks an existing room for a move or reset
    pub async fn lock_room(&self, session_id: &str) -> Result<RoomGuard, RoomError> {
        let shared = self
            .rooms
            .lock()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| RoomError::RoomNotFound(session_id.to_string()))?;

        Ok(shared.lock_owned().await)
    }

    /// Reports occupancy without creating the room
    pub async fn snapshot(&self, session_id: &str) -> Option<RoomSnapshot> {
        let shared = self.rooms.lock().await.get(session_id).cloned()?;
        let room = shared.lock().await;

        Some(RoomSnapshot {
            session_id: room.id.clone(),
            participant_count: room.participant_count(),
            is_full: room.is_full(),
        })
    }

    pub async fn contains(&self, session_id: &str) -> bool {
        self.rooms.lock().await.contains_key(session_id)
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.len()
    }

    async fn get_or_create(&self, session_id: &str) -> SharedRoom {
        let mut rooms = self.rooms.lock().await;
        match rooms.get(session_id) {
            Some(room) => Arc::clone(room),
            None => {
                info!(room_id = %session_id, "Creating room on first join");
                let room = Arc::new(Mutex::new(Room::new(session_id.to_string())));
                rooms.insert(session_id.to_string(), Arc::clone(&room));
                room
            }
        }
    }

    async fn is_registered(&self, session_id: &str, shared: &SharedRoom) -> bool {
        self.rooms
            .lock()
            .await
            .get(session_id)
            .is_some_and(|current| Arc::ptr_eq(current, shared))
    }
}
