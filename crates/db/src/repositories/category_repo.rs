//! Repository for the `prd_categories` table.

use std::collections::HashMap;

use rahnuma_core::types::DbId;
use sqlx::PgPool;

use crate::models::category::{Category, CategoryWithFeatures, CreateCategory, UpdateCategory};
use crate::models::feature::FeatureWithCriteria;
use crate::repositories::FeatureRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, prd_id, name, description, created_at, updated_at";

/// Provides CRUD operations for feature categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a new category for a PRD.
    pub async fn create(
        pool: &PgPool,
        prd_id: DbId,
        input: &CreateCategory,
    ) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO prd_categories (prd_id, name, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(prd_id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// List categories for a PRD in creation order (without features).
    pub async fn list_by_prd(pool: &PgPool, prd_id: DbId) -> Result<Vec<Category>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM prd_categories WHERE prd_id = $1 ORDER BY id ASC");
        sqlx::query_as::<_, Category>(&query)
            .bind(prd_id)
            .fetch_all(pool)
            .await
    }

    /// List categories for a PRD, each with its features and their criteria.
    ///
    /// Issues three queries regardless of how many categories exist.
    pub async fn list_with_features(
        pool: &PgPool,
        prd_id: DbId,
    ) -> Result<Vec<CategoryWithFeatures>, sqlx::Error> {
        let categories = Self::list_by_prd(pool, prd_id).await?;
        let category_ids: Vec<DbId> = categories.iter().map(|c| c.id).collect();

        let mut by_category: HashMap<DbId, Vec<FeatureWithCriteria>> = HashMap::new();
        for feature in FeatureRepo::list_by_categories_with_criteria(pool, &category_ids).await? {
            by_category
                .entry(feature.feature.category_id)
                .or_default()
                .push(feature);
        }

        Ok(categories
            .into_iter()
            .map(|category| {
                let features = by_category.remove(&category.id).unwrap_or_default();
                CategoryWithFeatures { category, features }
            })
            .collect())
    }

    /// Find a category by ID within a PRD.
    pub async fn find_in_prd(
        pool: &PgPool,
        prd_id: DbId,
        id: DbId,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM prd_categories WHERE id = $1 AND prd_id = $2");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(prd_id)
            .fetch_optional(pool)
            .await
    }

    /// Update a category within a PRD. Returns `None` if it does not belong there.
    pub async fn update(
        pool: &PgPool,
        prd_id: DbId,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE prd_categories SET
                name = COALESCE($3, name),
                description = COALESCE($4, description)
             WHERE id = $1 AND prd_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(prd_id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a category (and its features) within a PRD.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, prd_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM prd_categories WHERE id = $1 AND prd_id = $2")
            .bind(id)
            .bind(prd_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
