//! Project reference model and DTOs.

use rahnuma_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `project_references` table.
///
/// `content` holds extracted text (uploads, scraped pages) or whatever the
/// client submitted verbatim.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectReference {
    pub id: DbId,
    pub prd_id: DbId,
    pub name: String,
    pub content_type: String,
    pub content: String,
    pub uploaded_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for attaching a reference to a PRD.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProjectReference {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub content_type: String,
    #[serde(default)]
    pub content: String,
}
