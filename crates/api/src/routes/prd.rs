//! Route definitions for the `/prd` resource and everything nested under a
//! PRD.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{category, feature, prd, reference, role};
use crate::state::AppState;

/// Routes mounted at `/prd`.
///
/// ```text
/// GET    /                                              -> list
/// POST   /                                              -> create
/// GET    /{id}                                          -> get_by_id
/// PUT    /{id}                                          -> update
/// DELETE /{id}                                          -> delete
/// POST   /{id}/analyze                                  -> analyze
///
/// GET    /{id}/roles                                    -> list
/// POST   /{id}/roles                                    -> create
/// PUT    /{id}/roles/{role_id}                          -> update
/// DELETE /{id}/roles/{role_id}                          -> delete
///
/// GET    /{id}/categories                               -> list (with features)
/// POST   /{id}/categories                               -> create
/// PUT    /{id}/categories/{category_id}                 -> update
/// DELETE /{id}/categories/{category_id}                 -> delete
///
/// GET    /{id}/categories/{category_id}/features        -> list
/// POST   /{id}/categories/{category_id}/features        -> create
/// GET    /{id}/categories/{category_id}/features/{fid}  -> get_by_id
/// PUT    /{id}/categories/{category_id}/features/{fid}  -> update
/// DELETE /{id}/categories/{category_id}/features/{fid}  -> delete
///
/// GET    /{id}/references                               -> list
/// POST   /{id}/references                               -> create
/// DELETE /{id}/references/{reference_id}                -> delete
/// POST   /{id}/upload-references                        -> upload (multipart)
/// POST   /{id}/add-reference-urls                       -> add_urls
/// ```
pub fn router() -> Router<AppState> {
    let role_routes = Router::new()
        .route("/", get(role::list).post(role::create))
        .route("/{role_id}", put(role::update).delete(role::delete));

    let feature_routes = Router::new()
        .route("/", get(feature::list).post(feature::create))
        .route(
            "/{feature_id}",
            get(feature::get_by_id)
                .put(feature::update)
                .delete(feature::delete),
        );

    let category_routes = Router::new()
        .route("/", get(category::list).post(category::create))
        .route(
            "/{category_id}",
            put(category::update).delete(category::delete),
        )
        .nest("/{category_id}/features", feature_routes);

    let reference_routes = Router::new()
        .route("/", get(reference::list).post(reference::create))
        .route("/{reference_id}", axum::routing::delete(reference::delete));

    Router::new()
        .route("/", get(prd::list).post(prd::create))
        .route(
            "/{id}",
            get(prd::get_by_id).put(prd::update).delete(prd::delete),
        )
        .route("/{id}/analyze", post(prd::analyze))
        .route("/{id}/upload-references", post(reference::upload))
        .route("/{id}/add-reference-urls", post(reference::add_urls))
        .nest("/{id}/roles", role_routes)
        .nest("/{id}/categories", category_routes)
        .nest("/{id}/references", reference_routes)
}
