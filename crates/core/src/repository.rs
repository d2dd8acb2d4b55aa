use async_trait::async_trait;
use ticketline_db::{
    models::{CancelledBooking, EventSnapshot, UserBooking, WaitlistUser},
    queries::{bookings, bookings::ApplyOutcome, events, waitlist},
    PgPool, PgTx,
};
use ticketline_types::AppError;
use uuid::Uuid;

/// The capability set the booking engine depends on. Kept abstract so the
/// engine can be exercised against an in-memory implementation in tests.
///
/// `Tx` is whatever the implementation uses to scope the multi-step cancel:
/// the Postgres implementation threads a real transaction, a fake can use a
/// unit handle. Commit or rollback is the caller's responsibility on every
/// exit path.
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    type Tx: Send;

    /// Snapshot of the event's inventory, read without locks.
    async fn load_event_for_update(&self, event_id: Uuid)
        -> Result<Option<EventSnapshot>, AppError>;

    /// The version-CAS write: bump inventory and insert the booking, or
    /// report that another writer got there first.
    async fn conditional_apply_booking(
        &self,
        snapshot: &EventSnapshot,
        user_id: Uuid,
        quantity: i32,
    ) -> Result<ApplyOutcome, AppError>;

    async fn has_waitlist(&self, event_id: Uuid) -> Result<bool, AppError>;

    /// Idempotent per (user, event); arrival order is assigned by the store.
    async fn enqueue_waitlist(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        quantity: i32,
    ) -> Result<(), AppError>;

    async fn list_user_bookings(&self, user_id: Uuid) -> Result<Vec<UserBooking>, AppError>;

    async fn begin(&self) -> Result<Self::Tx, AppError>;
    async fn commit(&self, tx: Self::Tx) -> Result<(), AppError>;
    async fn rollback(&self, tx: Self::Tx) -> Result<(), AppError>;

    /// Take tickets off a booking the user owns. `None` covers absent, not
    /// owned and insufficient quantity alike.
    async fn decrement_booking(
        &self,
        tx: &mut Self::Tx,
        booking_id: Uuid,
        user_id: Uuid,
        quantity: i32,
    ) -> Result<Option<CancelledBooking>, AppError>;

    /// Pop the oldest waitlist entry fitting in `max_quantity`, skipping
    /// entries held by concurrent transactions.
    async fn promote_next_waitlister(
        &self,
        tx: &mut Self::Tx,
        event_id: Uuid,
        max_quantity: i32,
    ) -> Result<Option<WaitlistUser>, AppError>;

    async fn create_booking_in_tx(
        &self,
        tx: &mut Self::Tx,
        event_id: Uuid,
        user_id: Uuid,
        quantity: i32,
    ) -> Result<(), AppError>;

    async fn release_inventory(
        &self,
        tx: &mut Self::Tx,
        event_id: Uuid,
        quantity: i32,
    ) -> Result<(), AppError>;
}

/// Production implementation over the Postgres query layer.
#[derive(Clone)]
pub struct PgInventoryRepository {
    pool: PgPool,
}

impl PgInventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn store_error(err: anyhow::Error) -> AppError {
    AppError::Internal(err.to_string())
}

#[async_trait]
impl InventoryRepository for PgInventoryRepository {
    type Tx = PgTx;

    async fn load_event_for_update(
        &self,
        event_id: Uuid,
    ) -> Result<Option<EventSnapshot>, AppError> {
        events::load_snapshot(&self.pool, event_id)
            .await
            .map_err(store_error)
    }

    async fn conditional_apply_booking(
        &self,
        snapshot: &EventSnapshot,
        user_id: Uuid,
        quantity: i32,
    ) -> Result<ApplyOutcome, AppError> {
        bookings::conditional_apply_booking(&self.pool, snapshot, user_id, quantity)
            .await
            .map_err(store_error)
    }

    async fn has_waitlist(&self, event_id: Uuid) -> Result<bool, AppError> {
        waitlist::has_waitlist(&self.pool, event_id)
            .await
            .map_err(store_error)
    }

    async fn enqueue_waitlist(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        quantity: i32,
    ) -> Result<(), AppError> {
        waitlist::enqueue(&self.pool, event_id, user_id, quantity)
            .await
            .map_err(store_error)
    }

    async fn list_user_bookings(&self, user_id: Uuid) -> Result<Vec<UserBooking>, AppError> {
        bookings::list_user_bookings(&self.pool, user_id)
            .await
            .map_err(store_error)
    }

    async fn begin(&self) -> Result<Self::Tx, AppError> {
        Ok(self.pool.begin().await?)
    }

    async fn commit(&self, tx: Self::Tx) -> Result<(), AppError> {
        Ok(tx.commit().await?)
    }

    async fn rollback(&self, tx: Self::Tx) -> Result<(), AppError> {
        Ok(tx.rollback().await?)
    }

    async fn decrement_booking(
        &self,
        tx: &mut Self::Tx,
        booking_id: Uuid,
        user_id: Uuid,
        quantity: i32,
    ) -> Result<Option<CancelledBooking>, AppError> {
        bookings::decrement_booking(tx, booking_id, user_id, quantity)
            .await
            .map_err(store_error)
    }

    async fn promote_next_waitlister(
        &self,
        tx: &mut Self::Tx,
        event_id: Uuid,
        max_quantity: i32,
    ) -> Result<Option<WaitlistUser>, AppError> {
        waitlist::promote_next(tx, event_id, max_quantity)
            .await
            .map_err(store_error)
    }

    async fn create_booking_in_tx(
        &self,
        tx: &mut Self::Tx,
        event_id: Uuid,
        user_id: Uuid,
        quantity: i32,
    ) -> Result<(), AppError> {
        bookings::create_booking_in_tx(tx, event_id, user_id, quantity)
            .await
            .map_err(store_error)
    }

    async fn release_inventory(
        &self,
        tx: &mut Self::Tx,
        event_id: Uuid,
        quantity: i32,
    ) -> Result<(), AppError> {
        events::release_inventory(tx, event_id, quantity)
            .await
            .map_err(store_error)
    }
}
