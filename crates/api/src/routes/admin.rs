//! Route definitions for the admin score controls.

use axum::routing::post;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// POST   /projects/{id}/milestone-complete   -> milestone_complete
/// POST   /projects/{id}/delayed              -> project_delayed
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/projects/{id}/milestone-complete",
            post(admin::milestone_complete),
        )
        .route("/projects/{id}/delayed", post(admin::project_delayed))
}
