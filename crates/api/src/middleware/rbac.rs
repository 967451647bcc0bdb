//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! match the required role. The two roles are disjoint: a host cannot call
//! rider endpoints and a rider cannot call host endpoints.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use cyclebook_core::error::CoreError;
use cyclebook_core::roles::{ROLE_HOST, ROLE_USER};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `user` (rider) role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn riders_only(RequireRider(user): RequireRider) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireRider(pub AuthUser);

impl FromRequestParts<AppState> for RequireRider {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_USER {
            return Err(AppError::Core(CoreError::Forbidden(
                "User role required".into(),
            )));
        }
        Ok(RequireRider(user))
    }
}

/// Requires the `host` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn hosts_only(RequireHost(user): RequireHost) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireHost(pub AuthUser);

impl FromRequestParts<AppState> for RequireHost {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_HOST {
            return Err(AppError::Core(CoreError::Forbidden(
                "Host role required".into(),
            )));
        }
        Ok(RequireHost(user))
    }
}
