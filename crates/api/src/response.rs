//! Response envelope shared by every endpoint: exactly one of `data` and
//! `error` is non-null.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use ticketline_types::AppError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
struct Envelope<T: Serialize> {
    data: Option<T>,
    error: Option<ErrorBody>,
}

/// Error half of the envelope, carrying its HTTP status.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let status = StatusCode::from_u16(err.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %err, "request failed");
        }
        Self {
            status,
            code: err.error_code(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Envelope::<()> {
            data: None,
            error: Some(ErrorBody {
                code: self.code.to_string(),
                message: self.message,
            }),
        };
        (self.status, Json(body)).into_response()
    }
}

/// Wrap a payload in the success envelope.
pub fn json_ok<T: Serialize>(status: StatusCode, data: T) -> Response {
    (
        status,
        Json(Envelope {
            data: Some(data),
            error: None,
        }),
    )
        .into_response()
}

/// Create a NOT_FOUND error response
pub fn not_found(resource: &str) -> ApiError {
    ApiError::new(
        StatusCode::NOT_FOUND,
        "not_found",
        format!("{} not found", resource),
    )
}

/// Create a BAD_REQUEST error response
pub fn bad_request(message: impl Into<String>) -> ApiError {
    ApiError::new(StatusCode::BAD_REQUEST, "invalid_request", message)
}

/// Create an UNAUTHORIZED error response
pub fn unauthorized(message: impl Into<String>) -> ApiError {
    ApiError::new(StatusCode::UNAUTHORIZED, "unauthorized", message)
}

/// Create a FORBIDDEN error response
pub fn forbidden(message: impl Into<String>) -> ApiError {
    ApiError::new(StatusCode::FORBIDDEN, "forbidden", message)
}

/// Create an INTERNAL_SERVER_ERROR response
pub fn internal_error<E: std::fmt::Display>(err: E) -> ApiError {
    tracing::error!(error = %err, "request failed");
    ApiError::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        "server_error",
        err.to_string(),
    )
}
