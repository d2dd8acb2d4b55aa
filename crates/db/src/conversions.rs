//! Conversions from row models to API response types.

use crate::models::{Event, User, UserBooking};
use ticketline_types::api::{EventResponse, UserBookingResponse, UserResponse};

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            name: event.name,
            venue: event.venue,
            start_time: event.start_time,
            capacity: event.capacity,
            booked_tickets: event.booked_tickets,
            created_at: event.created_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

impl From<UserBooking> for UserBookingResponse {
    fn from(booking: UserBooking) -> Self {
        Self {
            id: booking.id,
            event_id: booking.event_id,
            event_name: booking.event_name,
            venue: booking.venue,
            start_time: booking.start_time,
            quantity: booking.quantity,
            created_at: booking.created_at,
        }
    }
}
