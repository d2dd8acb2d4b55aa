use axum::{extract::State, http::StatusCode, response::Response, Json};
use ticketline_db::queries::events;
use ticketline_types::api::{CreateEventRequest, EventResponse};
use validator::Validate;

use crate::middleware::{require_admin, AppState, AuthUser};
use crate::response::{self, ApiError};

/// Create a new event (admin only)
pub async fn create_event(
    user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateEventRequest>,
) -> Result<Response, ApiError> {
    require_admin(&user)?;

    payload
        .validate()
        .map_err(|e| response::bad_request(format!("Validation error: {}", e)))?;

    let event = events::create_event(
        &state.db,
        &payload.name,
        &payload.venue,
        payload.start_time,
        payload.capacity,
    )
    .await
    .map_err(response::internal_error)?;

    tracing::info!(event_id = %event.id, capacity = event.capacity, "event created");

    Ok(response::json_ok(
        StatusCode::CREATED,
        EventResponse::from(event),
    ))
}
