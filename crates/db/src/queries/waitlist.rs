use crate::models::WaitlistUser;
use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// True iff any waitlist entry exists for the event
pub async fn has_waitlist(pool: &PgPool, event_id: Uuid) -> Result<bool> {
    let (exists,): (bool,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM waitlist_entries WHERE event_id = $1)",
    )
    .bind(event_id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Enqueue a user for the event. At most one entry per (user, event); a
/// repeat enqueue is a no-op. `created_at` is assigned by the database and
/// establishes the FIFO order.
pub async fn enqueue(pool: &PgPool, event_id: Uuid, user_id: Uuid, quantity: i32) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO waitlist_entries (event_id, user_id, quantity)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, event_id) DO NOTHING
        "#,
    )
    .bind(event_id)
    .bind(user_id)
    .bind(quantity)
    .execute(pool)
    .await?;

    Ok(())
}

/// Pop the oldest waitlist entry for the event that fits in `max_quantity`.
///
/// One statement: the CTE selects the head with FOR UPDATE SKIP LOCKED so
/// parallel cancellations on the same event neither block on each other nor
/// promote the same entry twice, and the DELETE claims it. Entries larger
/// than `max_quantity` are skipped, not waited on.
pub async fn promote_next(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    event_id: Uuid,
    max_quantity: i32,
) -> Result<Option<WaitlistUser>> {
    let promoted = sqlx::query_as::<_, WaitlistUser>(
        r#"
        WITH next_entry AS (
            SELECT id FROM waitlist_entries
            WHERE event_id = $1 AND quantity <= $2
            ORDER BY created_at ASC
            FOR UPDATE SKIP LOCKED
            LIMIT 1
        )
        DELETE FROM waitlist_entries w
        USING next_entry
        WHERE w.id = next_entry.id
        RETURNING
            w.user_id,
            (SELECT email FROM users u WHERE u.id = w.user_id) AS email,
            w.quantity
        "#,
    )
    .bind(event_id)
    .bind(max_quantity)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(promoted)
}
