//! Repository for the `creators` table.

use boxiii_core::error::CoreError;
use boxiii_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::error::StoreError;
use crate::models::creator::{CreateCreator, Creator, UpdateCreator};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, display_name, description, platforms, categories, content_style, \
     expertise_areas, avatar_url, banner_url, follower_count, verified, created_at, updated_at";

/// Provides CRUD operations for creators.
pub struct CreatorRepo;

impl CreatorRepo {
    /// Insert a new creator, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCreator) -> Result<Creator, sqlx::Error> {
        let query = format!(
            "INSERT INTO creators
                (display_name, description, platforms, categories, content_style,
                 expertise_areas, avatar_url, banner_url, follower_count, verified)
             VALUES ($1, COALESCE($2, ''), COALESCE($3, '[]'::jsonb), COALESCE($4, '{{}}'),
                     COALESCE($5, 'educational'), COALESCE($6, '{{}}'), $7, $8,
                     COALESCE($9, 0), COALESCE($10, false))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Creator>(&query)
            .bind(&input.display_name)
            .bind(&input.description)
            .bind(input.platforms.as_ref().map(Json))
            .bind(&input.categories)
            .bind(&input.content_style)
            .bind(&input.expertise_areas)
            .bind(&input.avatar_url)
            .bind(&input.banner_url)
            .bind(input.follower_count)
            .bind(input.verified)
            .fetch_one(pool)
            .await
    }

    /// Find a creator by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Creator>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM creators WHERE id = $1");
        sqlx::query_as::<_, Creator>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List creators ordered by display name.
    ///
    /// With `with_sets_only`, creators that own no set are left out (the
    /// public viewer listing); without it every creator is returned (the
    /// admin listing).
    pub async fn list(
        pool: &PgPool,
        with_sets_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Creator>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM creators c
             WHERE $1 = false
                OR EXISTS (SELECT 1 FROM content_sets s WHERE s.creator_id = c.id)
             ORDER BY display_name ASC, id ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Creator>(&query)
            .bind(with_sets_only)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a creator. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCreator,
    ) -> Result<Option<Creator>, sqlx::Error> {
        let query = format!(
            "UPDATE creators SET
                display_name = COALESCE($2, display_name),
                description = COALESCE($3, description),
                platforms = COALESCE($4, platforms),
                categories = COALESCE($5, categories),
                content_style = COALESCE($6, content_style),
                expertise_areas = COALESCE($7, expertise_areas),
                avatar_url = COALESCE($8, avatar_url),
                banner_url = COALESCE($9, banner_url),
                follower_count = COALESCE($10, follower_count),
                verified = COALESCE($11, verified)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Creator>(&query)
            .bind(id)
            .bind(&input.display_name)
            .bind(&input.description)
            .bind(input.platforms.as_ref().map(Json))
            .bind(&input.categories)
            .bind(&input.content_style)
            .bind(&input.expertise_areas)
            .bind(&input.avatar_url)
            .bind(&input.banner_url)
            .bind(input.follower_count)
            .bind(input.verified)
            .fetch_optional(pool)
            .await
    }

    /// Delete a creator. Returns `false` if no such creator exists.
    ///
    /// Without `cascade`, a creator that still owns sets is not touched and
    /// [`CoreError::HasDependents`] is returned. With `cascade`, the owned
    /// sets and their cards are removed in the same transaction.
    pub async fn delete(pool: &PgPool, id: DbId, cascade: bool) -> Result<bool, StoreError> {
        let mut tx = pool.begin().await?;

        let locked = sqlx::query_scalar::<_, DbId>("SELECT id FROM creators WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Ok(false);
        }

        let dependents =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM content_sets WHERE creator_id = $1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        if dependents > 0 && !cascade {
            return Err(CoreError::HasDependents {
                entity: "Creator",
                id,
                dependents,
            }
            .into());
        }

        sqlx::query("DELETE FROM creators WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        if dependents > 0 {
            tracing::info!(creator_id = id, sets = dependents, "Deleted creator with cascade");
        }
        Ok(true)
    }
}
