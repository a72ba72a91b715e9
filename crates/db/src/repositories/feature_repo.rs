//! Repository for the `features` and `feature_acceptance_criteria` tables.

use std::collections::HashMap;

use rahnuma_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::feature::{
    AcceptanceCriterion, CreateFeature, CriterionInput, Feature, FeatureWithCriteria,
    UpdateFeature,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, category_id, title, description, priority, estimate_hours, created_at, updated_at";

/// Column list for acceptance criteria.
const CRITERIA_COLUMNS: &str = "id, feature_id, description, created_at, updated_at";

/// Provides CRUD operations for features. A feature and its acceptance
/// criteria are always written together in one transaction.
pub struct FeatureRepo;

impl FeatureRepo {
    /// Insert a feature and its acceptance criteria atomically.
    ///
    /// `priority` falls back to `medium` and `estimate_hours` to 0.
    pub async fn create(
        pool: &PgPool,
        category_id: DbId,
        input: &CreateFeature,
    ) -> Result<FeatureWithCriteria, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO features (category_id, title, description, priority, estimate_hours)
             VALUES ($1, $2, $3, COALESCE($4, 'medium'), COALESCE($5, 0))
             RETURNING {COLUMNS}"
        );
        let feature = sqlx::query_as::<_, Feature>(&query)
            .bind(category_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.priority)
            .bind(input.estimate_hours)
            .fetch_one(&mut *tx)
            .await?;

        let acceptance_criteria =
            Self::insert_criteria(&mut tx, feature.id, &input.acceptance_criteria).await?;

        tx.commit().await?;
        Ok(FeatureWithCriteria {
            feature,
            acceptance_criteria,
        })
    }

    /// Find a feature (with criteria) by ID within a category.
    pub async fn find_in_category(
        pool: &PgPool,
        category_id: DbId,
        id: DbId,
    ) -> Result<Option<FeatureWithCriteria>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM features WHERE id = $1 AND category_id = $2");
        let Some(feature) = sqlx::query_as::<_, Feature>(&query)
            .bind(id)
            .bind(category_id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };

        let acceptance_criteria = Self::list_criteria(pool, &[feature.id]).await?;
        Ok(Some(FeatureWithCriteria {
            feature,
            acceptance_criteria,
        }))
    }

    /// List features of one category with their criteria.
    pub async fn list_by_category_with_criteria(
        pool: &PgPool,
        category_id: DbId,
    ) -> Result<Vec<FeatureWithCriteria>, sqlx::Error> {
        Self::list_by_categories_with_criteria(pool, &[category_id]).await
    }

    /// List features of several categories with their criteria, ordered by
    /// feature id.
    pub async fn list_by_categories_with_criteria(
        pool: &PgPool,
        category_ids: &[DbId],
    ) -> Result<Vec<FeatureWithCriteria>, sqlx::Error> {
        if category_ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            "SELECT {COLUMNS} FROM features WHERE category_id = ANY($1) ORDER BY id ASC"
        );
        let features = sqlx::query_as::<_, Feature>(&query)
            .bind(category_ids)
            .fetch_all(pool)
            .await?;

        let feature_ids: Vec<DbId> = features.iter().map(|f| f.id).collect();
        let mut by_feature: HashMap<DbId, Vec<AcceptanceCriterion>> = HashMap::new();
        for criterion in Self::list_criteria(pool, &feature_ids).await? {
            by_feature
                .entry(criterion.feature_id)
                .or_default()
                .push(criterion);
        }

        Ok(features
            .into_iter()
            .map(|feature| {
                let acceptance_criteria = by_feature.remove(&feature.id).unwrap_or_default();
                FeatureWithCriteria {
                    feature,
                    acceptance_criteria,
                }
            })
            .collect())
    }

    /// Update a feature within a category. When the input carries
    /// `acceptance_criteria`, the existing criteria are replaced in the same
    /// transaction.
    ///
    /// Returns `None` if the feature does not belong to the category.
    pub async fn update(
        pool: &PgPool,
        category_id: DbId,
        id: DbId,
        input: &UpdateFeature,
    ) -> Result<Option<FeatureWithCriteria>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE features SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                priority = COALESCE($5, priority),
                estimate_hours = COALESCE($6, estimate_hours)
             WHERE id = $1 AND category_id = $2
             RETURNING {COLUMNS}"
        );
        let Some(feature) = sqlx::query_as::<_, Feature>(&query)
            .bind(id)
            .bind(category_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.priority)
            .bind(input.estimate_hours)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        if let Some(criteria) = &input.acceptance_criteria {
            sqlx::query("DELETE FROM feature_acceptance_criteria WHERE feature_id = $1")
                .bind(feature.id)
                .execute(&mut *tx)
                .await?;
            Self::insert_criteria(&mut tx, feature.id, criteria).await?;
        }

        tx.commit().await?;

        let acceptance_criteria = Self::list_criteria(pool, &[feature.id]).await?;
        Ok(Some(FeatureWithCriteria {
            feature,
            acceptance_criteria,
        }))
    }

    /// Delete a feature (and its criteria) within a category.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, category_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM features WHERE id = $1 AND category_id = $2")
            .bind(id)
            .bind(category_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_criteria(
        pool: &PgPool,
        feature_ids: &[DbId],
    ) -> Result<Vec<AcceptanceCriterion>, sqlx::Error> {
        if feature_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {CRITERIA_COLUMNS} FROM feature_acceptance_criteria
             WHERE feature_id = ANY($1)
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, AcceptanceCriterion>(&query)
            .bind(feature_ids)
            .fetch_all(pool)
            .await
    }

    async fn insert_criteria(
        conn: &mut PgConnection,
        feature_id: DbId,
        criteria: &[CriterionInput],
    ) -> Result<Vec<AcceptanceCriterion>, sqlx::Error> {
        let query = format!(
            "INSERT INTO feature_acceptance_criteria (feature_id, description)
             VALUES ($1, $2)
             RETURNING {CRITERIA_COLUMNS}"
        );
        let mut inserted = Vec::with_capacity(criteria.len());
        for criterion in criteria {
            let row = sqlx::query_as::<_, AcceptanceCriterion>(&query)
                .bind(feature_id)
                .bind(&criterion.description)
                .fetch_one(&mut *conn)
                .await?;
            inserted.push(row);
        }
        Ok(inserted)
    }
}
