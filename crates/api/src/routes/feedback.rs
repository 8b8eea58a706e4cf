//! Route definitions for the `/feedback` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::feedback;
use crate::state::AppState;

/// Routes mounted at `/feedback`.
///
/// ```text
/// POST   /          -> submit
/// GET    /mine      -> list_mine
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(feedback::submit))
        .route("/mine", get(feedback::list_mine))
}
