//! Handlers for the `/prd` resource itself.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rahnuma_core::error::CoreError;
use rahnuma_core::pagination::{
    clamp_limit, clamp_offset, Paginated, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT,
};
use rahnuma_core::prd::non_blank;
use rahnuma_core::types::DbId;
use rahnuma_db::models::prd::{CreatePrd, Prd, PrdDetail, PrdSummary, UpdatePrd};
use rahnuma_db::repositories::PrdRepo;
use rahnuma_db::DbPool;
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::SuccessResponse;
use crate::state::AppState;

/// Fail with 404 unless the PRD exists. Child-resource handlers call this
/// before touching their own tables.
pub(crate) async fn ensure_prd_exists(pool: &DbPool, prd_id: DbId) -> AppResult<()> {
    if PrdRepo::exists(pool, prd_id).await? {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "PRD",
            id: prd_id,
        }))
    }
}

/// GET /api/v1/prd
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<PrdSummary>>> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);
    let (items, count) = PrdRepo::list_page(&state.pool, limit, offset).await?;
    Ok(Json(Paginated { items, count }))
}

/// POST /api/v1/prd
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreatePrd>,
) -> AppResult<(StatusCode, Json<Prd>)> {
    let input = CreatePrd {
        title: input.title.trim().to_string(),
        client_name: input.client_name.trim().to_string(),
        project_overview: input.project_overview,
    };
    input.validate()?;

    let prd = PrdRepo::create(&state.pool, &input, Some(auth.user_id)).await?;
    tracing::info!(prd_id = prd.id, user_id = auth.user_id, "PRD created");
    Ok((StatusCode::CREATED, Json(prd)))
}

/// GET /api/v1/prd/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<PrdDetail>> {
    let detail = PrdRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "PRD", id }))?;
    Ok(Json(detail))
}

/// PUT /api/v1/prd/{id}
///
/// Blank fields are ignored rather than written.
pub async fn update(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePrd>,
) -> AppResult<Json<Prd>> {
    let input = UpdatePrd {
        title: non_blank(input.title.as_deref()).map(str::to_string),
        client_name: non_blank(input.client_name.as_deref()).map(str::to_string),
        project_overview: non_blank(input.project_overview.as_deref()).map(str::to_string),
    };
    input.validate()?;

    let prd = PrdRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "PRD", id }))?;
    Ok(Json(prd))
}

/// DELETE /api/v1/prd/{id}
pub async fn delete(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<SuccessResponse>> {
    if !PrdRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "PRD", id }));
    }
    tracing::info!(prd_id = id, "PRD deleted");
    Ok(SuccessResponse::ok())
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub prd_id: DbId,
    pub message: String,
}

/// POST /api/v1/prd/{id}/analyze
///
/// Placeholder for PRD analysis: it only checks that the PRD exists.
pub async fn analyze(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<AnalyzeResponse>> {
    ensure_prd_exists(&state.pool, id).await?;
    tracing::info!(prd_id = id, "PRD analysis requested");
    Ok(Json(AnalyzeResponse {
        success: true,
        prd_id: id,
        message: "PRD analysis completed".into(),
    }))
}
