use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 200))]
    pub venue: String,
    pub start_time: DateTime<Utc>,
    #[validate(range(min = 1))]
    pub capacity: i32,
}

/// Public view of an event. The OCC version column stays internal.
#[derive(Debug, Clone, Serialize)]
pub struct EventResponse {
    pub id: Uuid,
    pub name: String,
    pub venue: String,
    pub start_time: DateTime<Utc>,
    pub capacity: i32,
    pub booked_tickets: i32,
    pub created_at: DateTime<Utc>,
}
