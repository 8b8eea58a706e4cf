pub mod admin;
pub mod feedback;
pub mod health;
pub mod project;
pub mod user;

use axum::http::Method;
use axum::Router;

use crate::state::AppState;

/// Every method the route tree below answers; CORS allows exactly these.
pub const API_METHODS: [Method; 3] = [Method::GET, Method::POST, Method::PUT];

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                                    list (public)
/// /projects/{id}                               get (public)
///
/// /admin/projects/{id}/milestone-complete      +5, status On-time (session)
/// /admin/projects/{id}/delayed                 -10, status Delayed (session)
///
/// /feedback                                    submit (session)
/// /feedback/mine                               caller's submissions (session)
///
/// /user/profile                                get, upsert (session)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/admin", admin::router())
        .nest("/feedback", feedback::router())
        .nest("/user", user::router())
}
