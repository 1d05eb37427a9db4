use serde::{Deserialize, Serialize};

use super::registry::RoomSnapshot;

/// Response for the room availability probe
#[derive(Debug, Serialize, Deserialize)]
pub struct RoomAvailabilityResponse {
    pub session_id: String,
    pub participant_count: usize,
    pub is_full: bool,
}

impl RoomAvailabilityResponse {
    /// A session nobody has joined yet is simply an empty room
    pub fn vacant(session_id: String) -> Self {
        Self {
            session_id,
            participant_count: 0,
            is_full: false,
        }
    }
}

impl From<RoomSnapshot> for RoomAvailabilityResponse {
    fn from(snapshot: RoomSnapshot) -> Self {
        Self {
            session_id: snapshot.session_id,
            participant_count: snapshot.participant_count,
            is_full: snapshot.is_full,
        }
    }
}
