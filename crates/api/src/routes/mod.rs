pub mod auth;
pub mod health;
pub mod prd;
pub mod review;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/signup, /auth/register                     signup (public)
/// /auth/login                                      login (public)
/// /users/me                                        current user
/// /prd/...                                         PRDs and their children
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/prd", prd::router())
}
