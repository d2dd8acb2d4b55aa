use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub venue: String,
    pub start_time: DateTime<Utc>,
    pub capacity: i32,
    pub booked_tickets: i32,
    #[serde(skip_serializing)]
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inventory fields read without a lock; the version is validated on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct EventSnapshot {
    pub id: Uuid,
    pub capacity: i32,
    pub booked_tickets: i32,
    pub version: i32,
}
