//! Handlers for the caller's own profile.

use axum::extract::State;
use axum::Json;
use govtrust_core::profile::{self, ProfileUpdate, UserProfile};

use crate::error::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/user/profile
pub async fn get_mine(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<UserProfile>> {
    let profile = profile::get_profile(state.store(), &user.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("UserProfile", user.user_id))?;
    Ok(Json(profile))
}

/// PUT /api/v1/user/profile
pub async fn upsert_mine(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(input): ApiJson<ProfileUpdate>,
) -> AppResult<Json<UserProfile>> {
    let profile = profile::upsert_profile(state.store(), &user, &input).await?;
    Ok(Json(profile))
}
