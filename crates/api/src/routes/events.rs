use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use ticketline_db::queries::events;
use ticketline_types::api::EventResponse;
use uuid::Uuid;

use crate::middleware::AppState;
use crate::response::{self, ApiError};

/// List all events, soonest first (public)
pub async fn list_events(State(state): State<AppState>) -> Result<Response, ApiError> {
    let events = events::list_events(&state.db)
        .await
        .map_err(response::internal_error)?;

    let data: Vec<EventResponse> = events.into_iter().map(Into::into).collect();
    Ok(response::json_ok(StatusCode::OK, data))
}

/// Get event by ID (public)
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let event = events::find_by_id(&state.db, id)
        .await
        .map_err(response::internal_error)?
        .ok_or_else(|| response::not_found("Event"))?;

    Ok(response::json_ok(StatusCode::OK, EventResponse::from(event)))
}
