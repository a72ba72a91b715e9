//! PRD role (user persona) model and DTOs.

use rahnuma_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `prd_roles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PrdRole {
    pub id: DbId,
    pub prd_id: DbId,
    pub name: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for adding a role to a PRD.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePrdRole {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// DTO for updating a role. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePrdRole {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
}
