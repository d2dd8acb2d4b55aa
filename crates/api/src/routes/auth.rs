use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, http::StatusCode, response::Response, Json};
use ticketline_db::models::roles;
use ticketline_db::queries::users;
use ticketline_types::api::{LoginRequest, RegisterRequest, TokenResponse, UserResponse};
use ticketline_types::AppError;
use validator::Validate;

use crate::middleware::{sign_token, AppState};
use crate::response::{self, ApiError};

/// Register a new user. Everyone starts with the `user` role.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Response, ApiError> {
    payload
        .validate()
        .map_err(|e| response::bad_request(format!("Validation error: {}", e)))?;

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|_| response::internal_error("Password hashing failed"))?
        .to_string();

    let user = users::create(
        &state.db,
        &payload.name,
        &payload.email,
        &password_hash,
        roles::USER,
    )
    .await
    .map_err(|e| {
        if users::is_unique_violation(&e) {
            ApiError::from(AppError::EmailExists)
        } else {
            ApiError::from(AppError::Database(e))
        }
    })?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok(response::json_ok(
        StatusCode::CREATED,
        UserResponse::from(user),
    ))
}

/// Exchange credentials for a bearer token. Unknown email and wrong
/// password are indistinguishable to the caller.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    payload
        .validate()
        .map_err(|e| response::bad_request(format!("Validation error: {}", e)))?;

    let user = users::find_by_email(&state.db, &payload.email)
        .await
        .map_err(|e| ApiError::from(AppError::Database(e)))?
        .ok_or_else(|| ApiError::from(AppError::Unauthorized))?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| response::internal_error("Stored password hash is malformed"))?;
    Argon2::default()
        .verify_password(payload.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::from(AppError::Unauthorized))?;

    let token = sign_token(&user, &state.jwt_secret)
        .map_err(|_| response::internal_error("Token signing failed"))?;

    Ok(response::json_ok(StatusCode::OK, TokenResponse { token }))
}
