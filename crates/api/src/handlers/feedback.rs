//! Handlers for citizen feedback.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use govtrust_core::feedback::{self, FeedbackEntry, FeedbackReceipt, NewFeedback};

use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::middleware::auth::AuthUser;
use crate::response::{self, DataResponse};
use crate::state::AppState;

/// POST /api/v1/feedback
///
/// Attribution comes from the session, never from the request body.
pub async fn submit(
    State(state): State<AppState>,
    AuthUser(author): AuthUser,
    ApiJson(input): ApiJson<NewFeedback>,
) -> AppResult<(StatusCode, Json<FeedbackReceipt>)> {
    let receipt = feedback::submit_feedback(state.store(), &author, &input).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// GET /api/v1/feedback/mine
pub async fn list_mine(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<DataResponse<Vec<FeedbackEntry>>>> {
    let entries = feedback::list_feedback_for_user(state.store(), &user.user_id).await?;
    Ok(response::list(entries))
}
