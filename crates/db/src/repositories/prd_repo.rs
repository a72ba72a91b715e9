//! Repository for the `prds` table.

use rahnuma_core::types::DbId;
use sqlx::PgPool;

use crate::models::prd::{CreatePrd, Prd, PrdDetail, PrdSummary, UpdatePrd};
use crate::repositories::{CategoryRepo, PrdRoleRepo, ReferenceRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, title, client_name, project_overview, created_by, created_at, updated_at";

/// Columns for the list projection.
const SUMMARY_COLUMNS: &str = "id, title, client_name, created_at, updated_at";

/// Provides CRUD operations for PRDs.
pub struct PrdRepo;

impl PrdRepo {
    /// Insert a new PRD owned by `created_by`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePrd,
        created_by: Option<DbId>,
    ) -> Result<Prd, sqlx::Error> {
        let query = format!(
            "INSERT INTO prds (title, client_name, project_overview, created_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Prd>(&query)
            .bind(&input.title)
            .bind(&input.client_name)
            .bind(&input.project_overview)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a PRD by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Prd>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM prds WHERE id = $1");
        sqlx::query_as::<_, Prd>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Cheap existence check used by child-resource handlers.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM prds WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Load a PRD with roles, categories (with features and criteria) and
    /// references. Returns `None` if the PRD does not exist.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<PrdDetail>, sqlx::Error> {
        let Some(prd) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let roles = PrdRoleRepo::list_by_prd(pool, id).await?;
        let categories = CategoryRepo::list_with_features(pool, id).await?;
        let references = ReferenceRepo::list_by_prd(pool, id).await?;

        Ok(Some(PrdDetail {
            prd,
            roles,
            categories,
            references,
        }))
    }

    /// One page of PRDs, newest first, plus the total row count.
    pub async fn list_page(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<PrdSummary>, i64), sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM prds
             ORDER BY created_at DESC, id DESC
             LIMIT $1 OFFSET $2"
        );
        let items = sqlx::query_as::<_, PrdSummary>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM prds")
            .fetch_one(pool)
            .await?;

        Ok((items, count))
    }

    /// Update a PRD. Only `Some` fields in `input` are applied; the caller
    /// is expected to have dropped blank values already.
    ///
    /// `updated_at` is refreshed even when nothing else changes.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePrd,
    ) -> Result<Option<Prd>, sqlx::Error> {
        let query = format!(
            "UPDATE prds SET
                title = COALESCE($2, title),
                client_name = COALESCE($3, client_name),
                project_overview = COALESCE($4, project_overview),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Prd>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.client_name)
            .bind(&input.project_overview)
            .fetch_optional(pool)
            .await
    }

    /// Delete a PRD and, through cascades, everything under it.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM prds WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
