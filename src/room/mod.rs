// Public API - what other modules can use
pub use errors::RoomError;
pub use handlers::room_availability;
pub use models::{MatchResult, MoveOutcome, MoveResolution, Participant, Room, MAX_PARTICIPANTS};
pub use registry::{LeaveRoomResult, RoomGuard, RoomRegistry, RoomSnapshot};

// Internal modules
mod errors;
mod handlers;
pub mod models;
pub mod registry;
mod types;
