//! Shared response bodies for API handlers.

use axum::Json;
use serde::Serialize;

/// `{"success": true}` acknowledgement returned by deletes.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}
