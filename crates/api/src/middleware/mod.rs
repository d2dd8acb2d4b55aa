pub mod auth;

pub use auth::{require_admin, sign_token, AppState, AuthUser, Claims};
