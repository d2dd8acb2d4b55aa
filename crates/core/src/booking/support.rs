//! In-memory `InventoryRepository` for engine tests.
//!
//! Mirrors the store contract closely enough to exercise the engine's
//! decision points: real version checks on apply, FIFO-with-filter
//! promotion, idempotent enqueue. Version conflicts can be injected to
//! script races that the database would only produce under load.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use ticketline_db::models::{CancelledBooking, EventSnapshot, UserBooking, WaitlistUser};
use ticketline_db::queries::bookings::ApplyOutcome;
use ticketline_types::AppError;
use uuid::Uuid;

use crate::repository::InventoryRepository;

#[derive(Debug, Clone, Copy)]
struct EventState {
    capacity: i32,
    booked_tickets: i32,
    version: i32,
}

#[derive(Debug, Clone, Copy)]
struct BookingState {
    user_id: Uuid,
    event_id: Uuid,
    quantity: i32,
}

#[derive(Debug, Clone, Copy)]
struct WaitlistState {
    event_id: Uuid,
    user_id: Uuid,
    quantity: i32,
    seq: u64,
}

#[derive(Default)]
struct State {
    events: HashMap<Uuid, EventState>,
    users: HashMap<Uuid, String>,
    bookings: HashMap<Uuid, BookingState>,
    waitlist: Vec<WaitlistState>,
    next_seq: u64,
    apply_attempts: usize,
    conflicts_left: u32,
    booked_after_conflict: Option<(Uuid, i32)>,
}

pub struct MemoryRepository {
    state: Mutex<State>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    pub fn add_event(&self, capacity: i32, booked_tickets: i32) -> Uuid {
        let id = Uuid::new_v4();
        self.state.lock().unwrap().events.insert(
            id,
            EventState {
                capacity,
                booked_tickets,
                version: 0,
            },
        );
        id
    }

    pub fn add_user(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.state
            .lock()
            .unwrap()
            .users
            .insert(id, format!("{name}@example.com"));
        id
    }

    pub fn add_booking(&self, user_id: Uuid, event_id: Uuid, quantity: i32) -> Uuid {
        let id = Uuid::new_v4();
        self.state.lock().unwrap().bookings.insert(
            id,
            BookingState {
                user_id,
                event_id,
                quantity,
            },
        );
        id
    }

    pub fn add_waitlist(&self, event_id: Uuid, user_id: Uuid, quantity: i32) {
        let mut state = self.state.lock().unwrap();
        let seq = state.next_seq;
        state.next_seq += 1;
        state.waitlist.push(WaitlistState {
            event_id,
            user_id,
            quantity,
            seq,
        });
    }

    /// Fail the next `n` apply calls with a version conflict, bumping the
    /// event version as a real concurrent writer would.
    pub fn inject_version_conflicts(&self, n: u32) {
        self.state.lock().unwrap().conflicts_left = n;
    }

    /// When an injected conflict fires, also set the event's booked count,
    /// as if the winning writer took that inventory.
    pub fn set_booked_after_conflict(&self, event_id: Uuid, booked_tickets: i32) {
        self.state.lock().unwrap().booked_after_conflict = Some((event_id, booked_tickets));
    }

    pub fn apply_attempts(&self) -> usize {
        self.state.lock().unwrap().apply_attempts
    }

    pub fn booked_tickets(&self, event_id: Uuid) -> i32 {
        self.state.lock().unwrap().events[&event_id].booked_tickets
    }

    pub fn booking_quantities(&self, user_id: Uuid, event_id: Uuid) -> Vec<i32> {
        self.state
            .lock()
            .unwrap()
            .bookings
            .values()
            .filter(|b| b.user_id == user_id && b.event_id == event_id)
            .map(|b| b.quantity)
            .collect()
    }

    pub fn total_booked_quantity(&self, event_id: Uuid) -> i32 {
        self.state
            .lock()
            .unwrap()
            .bookings
            .values()
            .filter(|b| b.event_id == event_id)
            .map(|b| b.quantity)
            .sum()
    }

    pub fn waitlist_len(&self, event_id: Uuid) -> usize {
        self.waitlist_queue(event_id).len()
    }

    /// The queue in arrival order as (user, quantity) pairs.
    pub fn waitlist_queue(&self, event_id: Uuid) -> Vec<(Uuid, i32)> {
        let state = self.state.lock().unwrap();
        let mut entries: Vec<_> = state
            .waitlist
            .iter()
            .filter(|w| w.event_id == event_id)
            .collect();
        entries.sort_by_key(|w| w.seq);
        entries.iter().map(|w| (w.user_id, w.quantity)).collect()
    }
}

#[async_trait]
impl InventoryRepository for MemoryRepository {
    type Tx = ();

    async fn load_event_for_update(
        &self,
        event_id: Uuid,
    ) -> Result<Option<EventSnapshot>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state.events.get(&event_id).map(|e| EventSnapshot {
            id: event_id,
            capacity: e.capacity,
            booked_tickets: e.booked_tickets,
            version: e.version,
        }))
    }

    async fn conditional_apply_booking(
        &self,
        snapshot: &EventSnapshot,
        user_id: Uuid,
        quantity: i32,
    ) -> Result<ApplyOutcome, AppError> {
        let mut state = self.state.lock().unwrap();
        state.apply_attempts += 1;

        if state.conflicts_left > 0 {
            state.conflicts_left -= 1;
            let racer_update = state.booked_after_conflict.take();
            let event = state
                .events
                .get_mut(&snapshot.id)
                .ok_or_else(|| AppError::Internal("event vanished".to_string()))?;
            event.version += 1;
            if let Some((id, booked)) = racer_update {
                if id == snapshot.id {
                    event.booked_tickets = booked;
                }
            }
            return Ok(ApplyOutcome::VersionConflict);
        }

        let event = state
            .events
            .get_mut(&snapshot.id)
            .ok_or_else(|| AppError::Internal("event vanished".to_string()))?;
        if event.version != snapshot.version {
            return Ok(ApplyOutcome::VersionConflict);
        }

        event.booked_tickets += quantity;
        event.version += 1;
        state.bookings.insert(
            Uuid::new_v4(),
            BookingState {
                user_id,
                event_id: snapshot.id,
                quantity,
            },
        );
        Ok(ApplyOutcome::Applied)
    }

    async fn has_waitlist(&self, event_id: Uuid) -> Result<bool, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state.waitlist.iter().any(|w| w.event_id == event_id))
    }

    async fn enqueue_waitlist(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        quantity: i32,
    ) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        let exists = state
            .waitlist
            .iter()
            .any(|w| w.event_id == event_id && w.user_id == user_id);
        if !exists {
            let seq = state.next_seq;
            state.next_seq += 1;
            state.waitlist.push(WaitlistState {
                event_id,
                user_id,
                quantity,
                seq,
            });
        }
        Ok(())
    }

    async fn list_user_bookings(&self, user_id: Uuid) -> Result<Vec<UserBooking>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .bookings
            .iter()
            .filter(|(_, b)| b.user_id == user_id)
            .map(|(id, b)| UserBooking {
                id: *id,
                event_id: b.event_id,
                event_name: "event".to_string(),
                venue: "venue".to_string(),
                start_time: Utc::now(),
                quantity: b.quantity,
                created_at: Utc::now(),
            })
            .collect())
    }

    async fn begin(&self) -> Result<Self::Tx, AppError> {
        Ok(())
    }

    async fn commit(&self, _tx: Self::Tx) -> Result<(), AppError> {
        Ok(())
    }

    async fn rollback(&self, _tx: Self::Tx) -> Result<(), AppError> {
        Ok(())
    }

    async fn decrement_booking(
        &self,
        _tx: &mut Self::Tx,
        booking_id: Uuid,
        user_id: Uuid,
        quantity: i32,
    ) -> Result<Option<CancelledBooking>, AppError> {
        let mut state = self.state.lock().unwrap();
        let Some(booking) = state.bookings.get_mut(&booking_id) else {
            return Ok(None);
        };
        if booking.user_id != user_id || booking.quantity < quantity {
            return Ok(None);
        }

        booking.quantity -= quantity;
        let cancelled = CancelledBooking {
            event_id: booking.event_id,
            remaining: booking.quantity,
        };
        if cancelled.remaining == 0 {
            state.bookings.remove(&booking_id);
        }
        Ok(Some(cancelled))
    }

    async fn promote_next_waitlister(
        &self,
        _tx: &mut Self::Tx,
        event_id: Uuid,
        max_quantity: i32,
    ) -> Result<Option<WaitlistUser>, AppError> {
        let mut state = self.state.lock().unwrap();
        let next = state
            .waitlist
            .iter()
            .filter(|w| w.event_id == event_id && w.quantity <= max_quantity)
            .min_by_key(|w| w.seq)
            .copied();

        let Some(entry) = next else {
            return Ok(None);
        };
        state.waitlist.retain(|w| w.seq != entry.seq);

        let email = state
            .users
            .get(&entry.user_id)
            .cloned()
            .unwrap_or_else(|| "unknown@example.com".to_string());
        Ok(Some(WaitlistUser {
            user_id: entry.user_id,
            email,
            quantity: entry.quantity,
        }))
    }

    async fn create_booking_in_tx(
        &self,
        _tx: &mut Self::Tx,
        event_id: Uuid,
        user_id: Uuid,
        quantity: i32,
    ) -> Result<(), AppError> {
        self.state.lock().unwrap().bookings.insert(
            Uuid::new_v4(),
            BookingState {
                user_id,
                event_id,
                quantity,
            },
        );
        Ok(())
    }

    async fn release_inventory(
        &self,
        _tx: &mut Self::Tx,
        event_id: Uuid,
        quantity: i32,
    ) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        let event = state
            .events
            .get_mut(&event_id)
            .ok_or_else(|| AppError::Internal("event vanished".to_string()))?;
        event.booked_tickets -= quantity;
        event.version += 1;
        Ok(())
    }
}
