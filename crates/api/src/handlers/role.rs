//! Handlers for roles nested under a PRD (`/prd/{id}/roles`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rahnuma_core::error::CoreError;
use rahnuma_core::types::DbId;
use rahnuma_db::models::role::{CreatePrdRole, PrdRole, UpdatePrdRole};
use rahnuma_db::repositories::PrdRoleRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::prd::ensure_prd_exists;
use crate::middleware::auth::AuthUser;
use crate::response::SuccessResponse;
use crate::state::AppState;

fn role_not_found(prd_id: DbId, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFoundUnder {
        entity: "Role",
        id,
        parent: "PRD",
        parent_id: prd_id,
    })
}

/// POST /api/v1/prd/{id}/roles
pub async fn create(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(prd_id): Path<DbId>,
    Json(input): Json<CreatePrdRole>,
) -> AppResult<(StatusCode, Json<PrdRole>)> {
    input.validate()?;
    ensure_prd_exists(&state.pool, prd_id).await?;

    let role = PrdRoleRepo::create(&state.pool, prd_id, &input).await?;
    tracing::debug!(prd_id, role_id = role.id, "Role added");
    Ok((StatusCode::CREATED, Json(role)))
}

/// GET /api/v1/prd/{id}/roles
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(prd_id): Path<DbId>,
) -> AppResult<Json<Vec<PrdRole>>> {
    ensure_prd_exists(&state.pool, prd_id).await?;
    let roles = PrdRoleRepo::list_by_prd(&state.pool, prd_id).await?;
    Ok(Json(roles))
}

/// PUT /api/v1/prd/{id}/roles/{role_id}
pub async fn update(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((prd_id, role_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdatePrdRole>,
) -> AppResult<Json<PrdRole>> {
    input.validate()?;
    ensure_prd_exists(&state.pool, prd_id).await?;

    let role = PrdRoleRepo::update(&state.pool, prd_id, role_id, &input)
        .await?
        .ok_or_else(|| role_not_found(prd_id, role_id))?;
    Ok(Json(role))
}

/// DELETE /api/v1/prd/{id}/roles/{role_id}
pub async fn delete(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((prd_id, role_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<SuccessResponse>> {
    ensure_prd_exists(&state.pool, prd_id).await?;
    if !PrdRoleRepo::delete(&state.pool, prd_id, role_id).await? {
        return Err(role_not_found(prd_id, role_id));
    }
    Ok(SuccessResponse::ok())
}
