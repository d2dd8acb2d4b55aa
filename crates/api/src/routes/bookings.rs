use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Json,
};
use ticketline_core::booking::{cancel_booking, create_booking, BookingOutcome};
use ticketline_core::repository::InventoryRepository;
use ticketline_types::api::{
    BookingStatusResponse, CancelRequest, CreateBookingRequest, UserBookingResponse,
};
use tokio::time::Instant;
use uuid::Uuid;
use validator::Validate;

use crate::middleware::{AppState, AuthUser};
use crate::response::{self, ApiError};

/// Book tickets for an event, or join its waitlist. Body is optional; the
/// quantity defaults to one ticket.
pub async fn book_event(
    user: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    payload: Option<Json<CreateBookingRequest>>,
) -> Result<Response, ApiError> {
    let quantity = match payload {
        Some(Json(req)) => {
            req.validate()
                .map_err(|e| response::bad_request(format!("Validation error: {}", e)))?;
            req.quantity
        }
        None => 1,
    };

    let deadline = Instant::now() + state.request_timeout;
    let outcome = create_booking(&state.repo, event_id, user.user_id, quantity, deadline).await?;

    let (status, body) = match outcome {
        BookingOutcome::Booked => (
            StatusCode::CREATED,
            BookingStatusResponse {
                status: "booking created",
                quantity,
            },
        ),
        BookingOutcome::AddedToWaitlist => (
            StatusCode::ACCEPTED,
            BookingStatusResponse {
                status: "event sold out, added to waitlist",
                quantity,
            },
        ),
        BookingOutcome::JoinedWaitlist => (
            StatusCode::ACCEPTED,
            BookingStatusResponse {
                status: "joined the waitlist",
                quantity,
            },
        ),
    };

    Ok(response::json_ok(status, body))
}

/// Cancel tickets from one of the caller's bookings
pub async fn cancel_booking_route(
    user: AuthUser,
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    payload: Option<Json<CancelRequest>>,
) -> Result<StatusCode, ApiError> {
    let quantity = match payload {
        Some(Json(req)) => {
            req.validate()
                .map_err(|e| response::bad_request(format!("Validation error: {}", e)))?;
            req.quantity
        }
        None => 1,
    };

    cancel_booking(&state.repo, booking_id, user.user_id, quantity).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List the caller's bookings, newest first
pub async fn list_my_bookings(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let bookings = state.repo.list_user_bookings(user.user_id).await?;

    let data: Vec<UserBookingResponse> = bookings.into_iter().map(Into::into).collect();
    Ok(response::json_ok(StatusCode::OK, data))
}
