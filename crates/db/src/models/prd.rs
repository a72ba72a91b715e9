//! PRD entity model and DTOs.

use rahnuma_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::category::CategoryWithFeatures;
use crate::models::reference::ProjectReference;
use crate::models::role::PrdRole;

/// A row from the `prds` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Prd {
    pub id: DbId,
    pub title: String,
    pub client_name: String,
    pub project_overview: String,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Compact list-view projection of a PRD.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PrdSummary {
    pub id: DbId,
    pub title: String,
    pub client_name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A PRD with every child collection loaded.
#[derive(Debug, Clone, Serialize)]
pub struct PrdDetail {
    #[serde(flatten)]
    pub prd: Prd,
    pub roles: Vec<PrdRole>,
    pub categories: Vec<CategoryWithFeatures>,
    pub references: Vec<ProjectReference>,
}

/// DTO for creating a new PRD.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePrd {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 100))]
    pub client_name: String,
    #[serde(default)]
    pub project_overview: String,
}

/// DTO for updating an existing PRD. Missing or blank fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePrd {
    #[validate(length(max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 100))]
    pub client_name: Option<String>,
    pub project_overview: Option<String>,
}
