//! Session-token extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use govtrust_core::error::CoreError;
use govtrust_core::identity::Identity;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller extracted from a Bearer token in the `Authorization` header.
///
/// Any handler taking this extractor requires a session; requests without a
/// valid token are rejected with 401 before the handler runs. No role is
/// checked.
///
/// ```ignore
/// async fn my_handler(AuthUser(identity): AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %identity.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser(claims.into()))
    }
}
