use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookingRequest {
    #[serde(default = "default_quantity")]
    #[validate(range(min = 1))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CancelRequest {
    #[serde(default = "default_quantity")]
    #[validate(range(min = 1))]
    pub quantity: i32,
}

/// Outcome payload for the book endpoint.
#[derive(Debug, Serialize)]
pub struct BookingStatusResponse {
    pub status: &'static str,
    pub quantity: i32,
}

/// A booking joined with the event it is for, as shown in "my bookings".
#[derive(Debug, Clone, Serialize)]
pub struct UserBookingResponse {
    pub id: Uuid,
    pub event_id: Uuid,
    pub event_name: String,
    pub venue: String,
    pub start_time: DateTime<Utc>,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_defaults_to_one() {
        let req: CreateBookingRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.quantity, 1);
        let req: CancelRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.quantity, 1);
    }

    #[test]
    fn non_positive_quantity_fails_validation() {
        let req: CreateBookingRequest = serde_json::from_str(r#"{"quantity": 0}"#).unwrap();
        assert!(req.validate().is_err());
        let req: CancelRequest = serde_json::from_str(r#"{"quantity": -2}"#).unwrap();
        assert!(req.validate().is_err());
    }
}
