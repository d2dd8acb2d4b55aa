use ticketline_db::queries::bookings::ApplyOutcome;
use ticketline_types::AppError;
use tokio::time::Instant;
use uuid::Uuid;

use crate::repository::InventoryRepository;

/// Version-CAS attempts before surfacing the conflict to the caller. Bounded
/// so sustained contention shows up as an error instead of livelock.
pub const MAX_RETRIES: u32 = 3;

/// How a create request resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingOutcome {
    /// Tickets reserved; a booking row exists.
    Booked,
    /// A queue already existed, so the caller went to its tail regardless of
    /// apparent capacity.
    JoinedWaitlist,
    /// Capacity could not fit the request; the caller was enqueued.
    AddedToWaitlist,
}

/// Create a booking for `quantity` tickets, falling back to the waitlist.
///
/// The waitlist gate is sampled once, before the OCC loop: freed capacity
/// must reach queued users first, so a non-empty queue means newcomers
/// enqueue instead of racing for inventory. A racing cancellation that
/// empties the queue mid-flight does not reverse that decision.
///
/// Each OCC attempt re-reads the snapshot, so the capacity check is
/// re-evaluated after every conflict and may flip to the waitlist branch.
/// The deadline is checked before each attempt; an expired request reports
/// a conflict rather than starting another round-trip.
pub async fn create_booking<R: InventoryRepository>(
    repo: &R,
    event_id: Uuid,
    user_id: Uuid,
    quantity: i32,
    deadline: Instant,
) -> Result<BookingOutcome, AppError> {
    if quantity < 1 {
        return Err(AppError::Validation("quantity must be at least 1".to_string()));
    }

    if repo.has_waitlist(event_id).await? {
        repo.enqueue_waitlist(event_id, user_id, quantity).await?;
        tracing::info!(%user_id, %event_id, quantity, "waitlist non-empty, caller enqueued");
        return Ok(BookingOutcome::JoinedWaitlist);
    }

    for attempt in 1..=MAX_RETRIES {
        if Instant::now() >= deadline {
            tracing::warn!(%event_id, attempt, "request deadline expired before CAS attempt");
            return Err(AppError::BookingConflict);
        }

        let snapshot = repo
            .load_event_for_update(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

        // Requests larger than total capacity land here too; they wait on
        // the queue indefinitely, which is accepted.
        if snapshot.booked_tickets + quantity > snapshot.capacity {
            repo.enqueue_waitlist(event_id, user_id, quantity).await?;
            tracing::info!(%user_id, %event_id, quantity, "insufficient capacity, caller enqueued");
            return Ok(BookingOutcome::AddedToWaitlist);
        }

        match repo
            .conditional_apply_booking(&snapshot, user_id, quantity)
            .await?
        {
            ApplyOutcome::Applied => {
                tracing::info!(%user_id, %event_id, quantity, "booking confirmed");
                return Ok(BookingOutcome::Booked);
            }
            ApplyOutcome::VersionConflict => {
                tracing::warn!(%event_id, attempt, "version conflict, retrying");
            }
        }
    }

    tracing::warn!(%user_id, %event_id, "booking retries exhausted");
    Err(AppError::BookingConflict)
}
