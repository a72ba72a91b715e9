//! Feature and acceptance-criteria models and DTOs.

use rahnuma_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `features` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Feature {
    pub id: DbId,
    pub category_id: DbId,
    pub title: String,
    pub description: String,
    pub priority: String,
    pub estimate_hours: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `feature_acceptance_criteria` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AcceptanceCriterion {
    pub id: DbId,
    pub feature_id: DbId,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A feature with its acceptance criteria, in insertion order.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureWithCriteria {
    #[serde(flatten)]
    pub feature: Feature,
    pub acceptance_criteria: Vec<AcceptanceCriterion>,
}

/// One acceptance criterion in a create/update payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CriterionInput {
    #[validate(length(min = 1))]
    pub description: String,
}

/// DTO for creating a feature under a category.
///
/// `priority` defaults to `medium` and `estimate_hours` to 0 when omitted.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFeature {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: Option<String>,
    pub estimate_hours: Option<f64>,
    #[serde(default)]
    #[validate(nested)]
    pub acceptance_criteria: Vec<CriterionInput>,
}

/// DTO for updating a feature.
///
/// When `acceptance_criteria` is present it replaces the full list.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateFeature {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub estimate_hours: Option<f64>,
    #[validate(nested)]
    pub acceptance_criteria: Option<Vec<CriterionInput>>,
}
