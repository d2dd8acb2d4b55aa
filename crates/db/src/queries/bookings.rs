use crate::models::{CancelledBooking, EventSnapshot, UserBooking};
use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// Result of the version-checked inventory update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// Another writer committed against the same snapshot first.
    VersionConflict,
}

/// In one transaction: bump `booked_tickets` iff the event row still carries
/// the snapshot's version, then insert the booking. The `WHERE version = $2`
/// predicate is the compare-and-swap that serializes racing bookings.
pub async fn conditional_apply_booking(
    pool: &PgPool,
    snapshot: &EventSnapshot,
    user_id: Uuid,
    quantity: i32,
) -> Result<ApplyOutcome> {
    let mut tx = pool.begin().await?;

    let updated = sqlx::query(
        r#"
        UPDATE events
        SET booked_tickets = booked_tickets + $3,
            version = version + 1,
            updated_at = NOW()
        WHERE id = $1 AND version = $2
        "#,
    )
    .bind(snapshot.id)
    .bind(snapshot.version)
    .bind(quantity)
    .execute(&mut *tx)
    .await?;

    if updated.rows_affected() == 0 {
        tx.rollback().await.ok();
        return Ok(ApplyOutcome::VersionConflict);
    }

    sqlx::query("INSERT INTO bookings (user_id, event_id, quantity) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind(snapshot.id)
        .bind(quantity)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(ApplyOutcome::Applied)
}

/// Conditionally take `quantity` tickets off a booking the caller owns. The
/// single UPDATE distinguishes nothing for the caller: absent, not owned and
/// insufficient quantity all come back as `None`. The row lock it takes
/// serializes concurrent cancels of the same booking.
pub async fn decrement_booking(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    booking_id: Uuid,
    user_id: Uuid,
    quantity: i32,
) -> Result<Option<CancelledBooking>> {
    let cancelled = sqlx::query_as::<_, CancelledBooking>(
        r#"
        UPDATE bookings
        SET quantity = quantity - $3
        WHERE id = $1 AND user_id = $2 AND quantity >= $3
        RETURNING event_id, quantity AS remaining
        "#,
    )
    .bind(booking_id)
    .bind(user_id)
    .bind(quantity)
    .fetch_optional(&mut **tx)
    .await?;

    // A booking never persists at quantity zero.
    if let Some(c) = cancelled {
        if c.remaining == 0 {
            sqlx::query("DELETE FROM bookings WHERE id = $1")
                .bind(booking_id)
                .execute(&mut **tx)
                .await?;
        }
    }

    Ok(cancelled)
}

/// Insert a booking inside an existing transaction. Used when promoting a
/// waitlister: the freed tickets transfer holder-to-holder, so the event's
/// `booked_tickets` is not touched here.
pub async fn create_booking_in_tx(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    event_id: Uuid,
    user_id: Uuid,
    quantity: i32,
) -> Result<()> {
    sqlx::query("INSERT INTO bookings (user_id, event_id, quantity) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind(event_id)
        .bind(quantity)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

/// List a user's bookings joined with event details, newest first
pub async fn list_user_bookings(pool: &PgPool, user_id: Uuid) -> Result<Vec<UserBooking>> {
    let bookings = sqlx::query_as::<_, UserBooking>(
        r#"
        SELECT
            b.id,
            b.event_id,
            e.name AS event_name,
            e.venue,
            e.start_time,
            b.quantity,
            b.created_at
        FROM bookings b
        JOIN events e ON e.id = b.event_id
        WHERE b.user_id = $1
        ORDER BY b.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}
