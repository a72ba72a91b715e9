//! Repository for the `project_references` table.

use rahnuma_core::types::DbId;
use sqlx::PgPool;

use crate::models::reference::{CreateProjectReference, ProjectReference};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, prd_id, name, content_type, content, uploaded_at, created_at, updated_at";

/// Provides CRUD operations for project references.
pub struct ReferenceRepo;

impl ReferenceRepo {
    /// Insert a new reference for a PRD.
    pub async fn create(
        pool: &PgPool,
        prd_id: DbId,
        input: &CreateProjectReference,
    ) -> Result<ProjectReference, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_references (prd_id, name, content_type, content)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectReference>(&query)
            .bind(prd_id)
            .bind(&input.name)
            .bind(&input.content_type)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    /// Insert several references in one transaction; either all land or none.
    pub async fn create_many(
        pool: &PgPool,
        prd_id: DbId,
        inputs: &[CreateProjectReference],
    ) -> Result<Vec<ProjectReference>, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_references (prd_id, name, content_type, content)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );

        let mut tx = pool.begin().await?;
        let mut created = Vec::with_capacity(inputs.len());
        for input in inputs {
            let row = sqlx::query_as::<_, ProjectReference>(&query)
                .bind(prd_id)
                .bind(&input.name)
                .bind(&input.content_type)
                .bind(&input.content)
                .fetch_one(&mut *tx)
                .await?;
            created.push(row);
        }
        tx.commit().await?;
        Ok(created)
    }

    /// List references for a PRD in upload order.
    pub async fn list_by_prd(
        pool: &PgPool,
        prd_id: DbId,
    ) -> Result<Vec<ProjectReference>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_references WHERE prd_id = $1 ORDER BY id ASC"
        );
        sqlx::query_as::<_, ProjectReference>(&query)
            .bind(prd_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a reference within a PRD. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, prd_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM project_references WHERE id = $1 AND prd_id = $2")
            .bind(id)
            .bind(prd_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
