//! Handlers for features nested under a category
//! (`/prd/{id}/categories/{category_id}/features`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rahnuma_core::error::CoreError;
use rahnuma_core::prd::{validate_estimate_hours, FeaturePriority};
use rahnuma_core::types::DbId;
use rahnuma_db::models::feature::{CreateFeature, FeatureWithCriteria, UpdateFeature};
use rahnuma_db::repositories::FeatureRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::category::ensure_category_in_prd;
use crate::middleware::auth::AuthUser;
use crate::response::SuccessResponse;
use crate::state::AppState;

fn feature_not_found(category_id: DbId, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFoundUnder {
        entity: "Feature",
        id,
        parent: "Category",
        parent_id: category_id,
    })
}

/// Canonicalize `priority` and reject bad estimates before the database
/// CHECK constraints would.
fn normalize(
    priority: Option<&str>,
    estimate_hours: Option<f64>,
) -> Result<Option<String>, CoreError> {
    if let Some(hours) = estimate_hours {
        validate_estimate_hours(hours)?;
    }
    priority
        .map(|p| p.parse::<FeaturePriority>().map(|p| p.as_str().to_string()))
        .transpose()
}

/// POST /api/v1/prd/{id}/categories/{category_id}/features
pub async fn create(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((prd_id, category_id)): Path<(DbId, DbId)>,
    Json(mut input): Json<CreateFeature>,
) -> AppResult<(StatusCode, Json<FeatureWithCriteria>)> {
    input.validate()?;
    input.priority = normalize(input.priority.as_deref(), input.estimate_hours)?;
    ensure_category_in_prd(&state.pool, prd_id, category_id).await?;

    let feature = FeatureRepo::create(&state.pool, category_id, &input).await?;
    tracing::debug!(
        category_id,
        feature_id = feature.feature.id,
        criteria = feature.acceptance_criteria.len(),
        "Feature added"
    );
    Ok((StatusCode::CREATED, Json(feature)))
}

/// GET /api/v1/prd/{id}/categories/{category_id}/features
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((prd_id, category_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Vec<FeatureWithCriteria>>> {
    ensure_category_in_prd(&state.pool, prd_id, category_id).await?;
    let features = FeatureRepo::list_by_category_with_criteria(&state.pool, category_id).await?;
    Ok(Json(features))
}

/// GET /api/v1/prd/{id}/categories/{category_id}/features/{feature_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((prd_id, category_id, feature_id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<Json<FeatureWithCriteria>> {
    ensure_category_in_prd(&state.pool, prd_id, category_id).await?;
    let feature = FeatureRepo::find_in_category(&state.pool, category_id, feature_id)
        .await?
        .ok_or_else(|| feature_not_found(category_id, feature_id))?;
    Ok(Json(feature))
}

/// PUT /api/v1/prd/{id}/categories/{category_id}/features/{feature_id}
///
/// A present `acceptance_criteria` list replaces the stored one.
pub async fn update(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((prd_id, category_id, feature_id)): Path<(DbId, DbId, DbId)>,
    Json(mut input): Json<UpdateFeature>,
) -> AppResult<Json<FeatureWithCriteria>> {
    input.validate()?;
    input.priority = normalize(input.priority.as_deref(), input.estimate_hours)?;
    ensure_category_in_prd(&state.pool, prd_id, category_id).await?;

    let feature = FeatureRepo::update(&state.pool, category_id, feature_id, &input)
        .await?
        .ok_or_else(|| feature_not_found(category_id, feature_id))?;
    Ok(Json(feature))
}

/// DELETE /api/v1/prd/{id}/categories/{category_id}/features/{feature_id}
pub async fn delete(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((prd_id, category_id, feature_id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<Json<SuccessResponse>> {
    ensure_category_in_prd(&state.pool, prd_id, category_id).await?;
    if !FeatureRepo::delete(&state.pool, category_id, feature_id).await? {
        return Err(feature_not_found(category_id, feature_id));
    }
    Ok(SuccessResponse::ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_is_canonicalized() {
        assert_eq!(normalize(Some(" HIGH "), None).unwrap().as_deref(), Some("high"));
        assert_eq!(normalize(None, Some(4.5)).unwrap(), None);
    }

    #[test]
    fn bad_priority_and_negative_estimate_are_rejected() {
        assert!(matches!(
            normalize(Some("urgent"), None),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            normalize(Some("low"), Some(-2.0)),
            Err(CoreError::Validation(_))
        ));
    }
}
