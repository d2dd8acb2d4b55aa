pub mod cancel;
pub mod create;

#[cfg(test)]
pub(crate) mod support;

pub use cancel::{cancel_booking, CancelReceipt};
pub use create::{create_booking, BookingOutcome, MAX_RETRIES};
