use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Result of a successful booking decrement. `remaining` is the quantity the
/// booking still holds after the update; the row is gone when it reaches zero.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct CancelledBooking {
    pub event_id: Uuid,
    pub remaining: i32,
}

/// Booking joined with its event for the "my bookings" listing.
#[derive(Debug, Clone, FromRow)]
pub struct UserBooking {
    pub id: Uuid,
    pub event_id: Uuid,
    pub event_name: String,
    pub venue: String,
    pub start_time: DateTime<Utc>,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}
