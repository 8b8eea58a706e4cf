//! Request extractors whose rejections use the API's JSON error body.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;

use crate::error::AppError;

/// JSON request body.
///
/// Same as [`axum::Json`] on the way in, but a malformed, mistyped, or
/// non-JSON body becomes [`AppError::BadRequest`] so clients always get
/// `{ "error": ..., "code": "BAD_REQUEST" }`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected request body");
        AppError::BadRequest(rejection.body_text())
    }
}
