//! Repository for the `prd_roles` table.

use rahnuma_core::types::DbId;
use sqlx::PgPool;

use crate::models::role::{CreatePrdRole, PrdRole, UpdatePrdRole};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, prd_id, name, description, created_at, updated_at";

/// Provides CRUD operations for PRD roles. Every lookup by role id is scoped
/// to its PRD.
pub struct PrdRoleRepo;

impl PrdRoleRepo {
    /// Insert a new role for a PRD.
    pub async fn create(
        pool: &PgPool,
        prd_id: DbId,
        input: &CreatePrdRole,
    ) -> Result<PrdRole, sqlx::Error> {
        let query = format!(
            "INSERT INTO prd_roles (prd_id, name, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PrdRole>(&query)
            .bind(prd_id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// List roles for a PRD in creation order.
    pub async fn list_by_prd(pool: &PgPool, prd_id: DbId) -> Result<Vec<PrdRole>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM prd_roles WHERE prd_id = $1 ORDER BY id ASC");
        sqlx::query_as::<_, PrdRole>(&query)
            .bind(prd_id)
            .fetch_all(pool)
            .await
    }

    /// Find a role by ID within a PRD.
    pub async fn find_in_prd(
        pool: &PgPool,
        prd_id: DbId,
        id: DbId,
    ) -> Result<Option<PrdRole>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM prd_roles WHERE id = $1 AND prd_id = $2");
        sqlx::query_as::<_, PrdRole>(&query)
            .bind(id)
            .bind(prd_id)
            .fetch_optional(pool)
            .await
    }

    /// Update a role within a PRD. Returns `None` if it does not belong there.
    pub async fn update(
        pool: &PgPool,
        prd_id: DbId,
        id: DbId,
        input: &UpdatePrdRole,
    ) -> Result<Option<PrdRole>, sqlx::Error> {
        let query = format!(
            "UPDATE prd_roles SET
                name = COALESCE($3, name),
                description = COALESCE($4, description)
             WHERE id = $1 AND prd_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PrdRole>(&query)
            .bind(id)
            .bind(prd_id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a role within a PRD. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, prd_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM prd_roles WHERE id = $1 AND prd_id = $2")
            .bind(id)
            .bind(prd_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
