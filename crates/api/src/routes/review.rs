use axum::routing::post;
use axum::Router;

use crate::handlers::review;
use crate::state::AppState;

/// Pull-request views, mounted at the root (not under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pull-request", post(review::pull_request))
        .route("/summarize", post(review::summarize))
}
