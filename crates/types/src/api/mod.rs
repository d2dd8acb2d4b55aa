pub mod auth;
pub mod bookings;
pub mod events;

pub use auth::{LoginRequest, RegisterRequest, TokenResponse, UserResponse};
pub use bookings::{BookingStatusResponse, CancelRequest, CreateBookingRequest, UserBookingResponse};
pub use events::{CreateEventRequest, EventResponse};
