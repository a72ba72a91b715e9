//! Domain-level error type shared by the db, review and api crates.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// A child row looked up through a parent it does not belong to
    /// (e.g. a role addressed under the wrong PRD).
    #[error("Entity not found: {entity} with id {id} under {parent} {parent_id}")]
    NotFoundUnder {
        entity: &'static str,
        id: DbId,
        parent: &'static str,
        parent_id: DbId,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CoreError::Validation(errors.to_string())
    }
}
