use ticketline_db::models::WaitlistUser;
use ticketline_types::AppError;
use uuid::Uuid;

use crate::repository::InventoryRepository;

/// What a committed cancellation did with the freed tickets.
#[derive(Debug, Clone)]
pub struct CancelReceipt {
    pub event_id: Uuid,
    /// Tickets taken off the caller's booking.
    pub cancelled: i32,
    /// Waitlisters who received bookings, in promotion order.
    pub promoted: Vec<WaitlistUser>,
    /// Remainder returned to general inventory.
    pub released: i32,
}

/// Cancel `quantity` tickets from a booking the user owns.
///
/// Runs as one transaction: decrement the booking, hand the freed tickets to
/// waitlisted users oldest-first, release whatever the queue could not
/// absorb. Promoted transfers move tickets holder-to-holder, so
/// `booked_tickets` only changes for the released remainder.
pub async fn cancel_booking<R: InventoryRepository>(
    repo: &R,
    booking_id: Uuid,
    user_id: Uuid,
    quantity: i32,
) -> Result<CancelReceipt, AppError> {
    if quantity < 1 {
        return Err(AppError::Validation("quantity must be at least 1".to_string()));
    }

    let mut tx = repo.begin().await?;

    match cancel_and_promote(repo, &mut tx, booking_id, user_id, quantity).await {
        Ok(receipt) => {
            repo.commit(tx).await?;
            tracing::info!(
                %user_id,
                event_id = %receipt.event_id,
                cancelled = receipt.cancelled,
                promoted = receipt.promoted.len(),
                released = receipt.released,
                "booking cancelled"
            );
            Ok(receipt)
        }
        Err(err) => {
            let _ = repo.rollback(tx).await;
            Err(err)
        }
    }
}

async fn cancel_and_promote<R: InventoryRepository>(
    repo: &R,
    tx: &mut R::Tx,
    booking_id: Uuid,
    user_id: Uuid,
    quantity: i32,
) -> Result<CancelReceipt, AppError> {
    let cancelled = repo
        .decrement_booking(tx, booking_id, user_id, quantity)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    let mut remaining = quantity;
    let mut promoted = Vec::new();

    // Oldest-first, but entries wanting more than what is left are skipped
    // so a large head request does not strand freed tickets.
    while remaining > 0 {
        let Some(next) = repo
            .promote_next_waitlister(tx, cancelled.event_id, remaining)
            .await?
        else {
            break;
        };

        repo.create_booking_in_tx(tx, cancelled.event_id, next.user_id, next.quantity)
            .await?;
        tracing::info!(
            user_id = %next.user_id,
            event_id = %cancelled.event_id,
            quantity = next.quantity,
            "waitlister promoted"
        );

        remaining -= next.quantity;
        promoted.push(next);
    }

    if remaining > 0 {
        repo.release_inventory(tx, cancelled.event_id, remaining).await?;
    }

    Ok(CancelReceipt {
        event_id: cancelled.event_id,
        cancelled: quantity,
        promoted,
        released: remaining,
    })
}
