use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    RequestPartsExt,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use ticketline_core::PgInventoryRepository;
use ticketline_db::{models::User, PgPool};
use ticketline_types::AppError;
use uuid::Uuid;

use crate::response::{self, ApiError};

/// Tokens outlive a session by a day; clients re-login after that.
const TOKEN_TTL_HOURS: i64 = 24;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub repo: PgInventoryRepository,
    pub jwt_secret: String,
    /// Per-request budget for the booking engine's database work.
    pub request_timeout: Duration,
}

/// Bearer token claims, HMAC-SHA256 signed.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

/// Issue a signed token for a user
pub fn sign_token(user: &User, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: user.id.to_string(),
        role: user.role.clone(),
        exp: (Utc::now() + chrono::Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify and decode a bearer token
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

/// Extractor for authenticated caller identity
/// Usage: async fn handler(user: AuthUser)
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ticketline_db::models::roles::ADMIN
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| response::unauthorized("Missing or invalid Authorization header"))?;

        let app_state = AppState::from_ref(state);

        let claims = verify_token(bearer.token(), &app_state.jwt_secret)
            .map_err(|e| response::unauthorized(format!("Invalid token: {}", e)))?;

        let user_id: Uuid = claims
            .sub
            .parse()
            .map_err(|_| response::unauthorized("Invalid user ID in token"))?;

        Ok(AuthUser {
            user_id,
            role: claims.role,
        })
    }
}

/// Reject non-admin callers on admin routes
pub fn require_admin(user: &AuthUser) -> Result<(), AppError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
