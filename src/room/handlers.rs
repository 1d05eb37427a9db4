use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, instrument};

use super::types::RoomAvailabilityResponse;
use crate::shared::{AppError, AppState};

/// HTTP handler for checking whether a session can still be joined
///
/// GET /rooms/:session_id
/// Never creates the room; unknown sessions report as empty
#[instrument(name = "room_availability", skip(state))]
pub async fn room_availability(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<RoomAvailabilityResponse>, AppError> {
    if session_id.trim().is_empty() {
        return Err(AppError::BadRequest("Session id cannot be empty".to_string()));
    }

    let response = match state.room_registry.snapshot(&session_id).await {
        Some(snapshot) => RoomAvailabilityResponse::from(snapshot),
        None => RoomAvailabilityResponse::vacant(session_id),
    };

    info!(
        room_id = %response.session_id,
        participant_count = response.participant_count,
        is_full = response.is_full,
        "Room availability checked"
    );

    Ok(Json(response))
}
