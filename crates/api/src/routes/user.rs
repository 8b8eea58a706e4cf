use axum::routing::get;
use axum::Router;

use crate::handlers::profile;
use crate::state::AppState;

/// Routes mounted at `/user`.
///
/// ```text
/// GET    /profile   -> get_mine
/// PUT    /profile   -> upsert_mine
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/profile",
        get(profile::get_mine).put(profile::upsert_mine),
    )
}
