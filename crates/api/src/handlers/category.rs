//! Handlers for feature categories nested under a PRD.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rahnuma_core::error::CoreError;
use rahnuma_core::types::DbId;
use rahnuma_db::models::category::{
    Category, CategoryWithFeatures, CreateCategory, UpdateCategory,
};
use rahnuma_db::repositories::CategoryRepo;
use rahnuma_db::DbPool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::prd::ensure_prd_exists;
use crate::middleware::auth::AuthUser;
use crate::response::SuccessResponse;
use crate::state::AppState;

fn category_not_found(prd_id: DbId, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFoundUnder {
        entity: "Category",
        id,
        parent: "PRD",
        parent_id: prd_id,
    })
}

/// Resolve a category through its PRD: 404 for a missing PRD, and 404 for a
/// category that exists but belongs to another PRD.
pub(crate) async fn ensure_category_in_prd(
    pool: &DbPool,
    prd_id: DbId,
    category_id: DbId,
) -> AppResult<Category> {
    ensure_prd_exists(pool, prd_id).await?;
    CategoryRepo::find_in_prd(pool, prd_id, category_id)
        .await?
        .ok_or_else(|| category_not_found(prd_id, category_id))
}

/// POST /api/v1/prd/{id}/categories
pub async fn create(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(prd_id): Path<DbId>,
    Json(input): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<Category>)> {
    input.validate()?;
    ensure_prd_exists(&state.pool, prd_id).await?;

    let category = CategoryRepo::create(&state.pool, prd_id, &input).await?;
    tracing::debug!(prd_id, category_id = category.id, "Category added");
    Ok((StatusCode::CREATED, Json(category)))
}

/// GET /api/v1/prd/{id}/categories
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(prd_id): Path<DbId>,
) -> AppResult<Json<Vec<CategoryWithFeatures>>> {
    ensure_prd_exists(&state.pool, prd_id).await?;
    let categories = CategoryRepo::list_with_features(&state.pool, prd_id).await?;
    Ok(Json(categories))
}

/// PUT /api/v1/prd/{id}/categories/{category_id}
pub async fn update(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((prd_id, category_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateCategory>,
) -> AppResult<Json<Category>> {
    input.validate()?;
    ensure_prd_exists(&state.pool, prd_id).await?;

    let category = CategoryRepo::update(&state.pool, prd_id, category_id, &input)
        .await?
        .ok_or_else(|| category_not_found(prd_id, category_id))?;
    Ok(Json(category))
}

/// DELETE /api/v1/prd/{id}/categories/{category_id}
pub async fn delete(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((prd_id, category_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<SuccessResponse>> {
    ensure_prd_exists(&state.pool, prd_id).await?;
    if !CategoryRepo::delete(&state.pool, prd_id, category_id).await? {
        return Err(category_not_found(prd_id, category_id));
    }
    Ok(SuccessResponse::ok())
}
