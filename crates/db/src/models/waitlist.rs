use sqlx::FromRow;
use uuid::Uuid;

/// A promoted waitlister, popped from the queue inside a cancel transaction.
#[derive(Debug, Clone, FromRow)]
pub struct WaitlistUser {
    pub user_id: Uuid,
    pub email: String,
    pub quantity: i32,
}
