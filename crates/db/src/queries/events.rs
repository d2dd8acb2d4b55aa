use crate::models::{Event, EventSnapshot};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// List all events, soonest first
pub async fn list_events(pool: &PgPool) -> Result<Vec<Event>> {
    let events = sqlx::query_as::<_, Event>(
        "SELECT * FROM events ORDER BY start_time ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(events)
}

/// Get event by ID
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Event>> {
    let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(event)
}

/// Create new event (admin only). Inventory starts empty at version zero.
pub async fn create_event(
    pool: &PgPool,
    name: &str,
    venue: &str,
    start_time: DateTime<Utc>,
    capacity: i32,
) -> Result<Event> {
    let event = sqlx::query_as::<_, Event>(
        r#"
        INSERT INTO events (name, venue, start_time, capacity)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(venue)
    .bind(start_time)
    .bind(capacity)
    .fetch_one(pool)
    .await?;

    Ok(event)
}

/// Read the inventory snapshot without holding a row lock. Concurrency is
/// enforced by the version compare on write, not here.
pub async fn load_snapshot(pool: &PgPool, event_id: Uuid) -> Result<Option<EventSnapshot>> {
    let snapshot = sqlx::query_as::<_, EventSnapshot>(
        "SELECT id, capacity, booked_tickets, version FROM events WHERE id = $1",
    )
    .bind(event_id)
    .fetch_optional(pool)
    .await?;

    Ok(snapshot)
}

/// Return freed tickets to general inventory. Used only for the remainder the
/// waitlist could not absorb.
pub async fn release_inventory(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    event_id: Uuid,
    quantity: i32,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE events
        SET booked_tickets = booked_tickets - $2,
            version = version + 1,
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(event_id)
    .bind(quantity)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
