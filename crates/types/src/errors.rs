use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Booking conflict, please try again")]
    BookingConflict,

    #[error("A user with this email already exists")]
    EmailExists,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Database(_) | Self::Internal(_) => 500,
            Self::NotFound(_) => 404,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::BadRequest(_) | Self::Validation(_) => 400,
            Self::BookingConflict | Self::EmailExists => 409,
        }
    }

    /// Stable machine-readable code for the response envelope.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Database(_) | Self::Internal(_) => "server_error",
            Self::NotFound(_) => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::BadRequest(_) | Self::Validation(_) => "invalid_request",
            Self::BookingConflict => "booking_conflict",
            Self::EmailExists => "email_exists",
        }
    }
}
