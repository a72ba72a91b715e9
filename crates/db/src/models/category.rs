//! Feature category model and DTOs.

use rahnuma_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::feature::FeatureWithCriteria;

/// A row from the `prd_categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub prd_id: DbId,
    pub name: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A category together with its features.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryWithFeatures {
    #[serde(flatten)]
    pub category: Category,
    pub features: Vec<FeatureWithCriteria>,
}

/// DTO for adding a category to a PRD.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// DTO for updating a category. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
}
