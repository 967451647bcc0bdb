//! Bearer-token identity extraction.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use cyclebook_core::error::CoreError;
use cyclebook_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The identity proven by the JWT on the request.
///
/// Taking this as a handler parameter makes the route require a valid,
/// unexpired token; the wrappers in [`super::rbac`] additionally pin
/// the role. Carries only what the booking endpoints need: who is
/// asking (`user_id`) and what they are (`role`).
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// From `claims.sub`.
    pub user_id: DbId,
    /// `"user"` (rider) or `"host"`.
    pub role: String,
}

fn reject(reason: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(reason.into()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| reject("Missing Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| reject("Expected a Bearer token"))?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| reject("Invalid or expired token"))?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}
