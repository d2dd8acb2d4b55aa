pub mod booking;
pub mod repository;

pub use booking::{cancel_booking, create_booking, BookingOutcome, CancelReceipt, MAX_RETRIES};
pub use repository::{InventoryRepository, PgInventoryRepository};
