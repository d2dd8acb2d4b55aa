pub mod booking;
pub mod event;
pub mod user;
pub mod waitlist;

pub use booking::{CancelledBooking, UserBooking};
pub use event::{Event, EventSnapshot};
pub use user::{roles, User};
pub use waitlist::WaitlistUser;
