//! Repository for the `content_sets` table.

use boxiii_core::error::CoreError;
use boxiii_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::error::StoreError;
use crate::models::content_set::{ContentSet, ContentSetFilter, CreateContentSet, UpdateContentSet};
use crate::repositories::NumberingRepo;

/// Column list shared across queries. `last_card_number` is internal to
/// numbering and never selected.
pub(crate) const COLUMNS: &str = "id, set_number, creator_id, title, description, category, \
     difficulty_level, target_audience, content_style, card_count, estimated_time_minutes, \
     tags, prerequisites, learning_outcomes, status, language, created_at, updated_at";

/// Provides CRUD operations for content sets.
pub struct ContentSetRepo;

impl ContentSetRepo {
    /// Insert a new empty set with a freshly assigned set number.
    ///
    /// Fails with [`CoreError::NotFound`] if the creator does not exist or is
    /// deleted while this insert waits for it.
    pub async fn create(pool: &PgPool, input: &CreateContentSet) -> Result<ContentSet, StoreError> {
        let mut tx = pool.begin().await?;

        // Share lock keeps the creator from being deleted mid-insert.
        let creator =
            sqlx::query_scalar::<_, DbId>("SELECT id FROM creators WHERE id = $1 FOR SHARE")
                .bind(input.creator_id)
                .fetch_optional(&mut *tx)
                .await?;
        if creator.is_none() {
            return Err(CoreError::NotFound {
                entity: "Creator",
                id: input.creator_id,
            }
            .into());
        }

        let set_number = NumberingRepo::next_set_number(&mut tx).await?;

        let query = format!(
            "INSERT INTO content_sets
                (set_number, creator_id, title, description, category, difficulty_level,
                 target_audience, content_style, estimated_time_minutes, tags, prerequisites,
                 learning_outcomes, status, language)
             VALUES ($1, $2, $3, COALESCE($4, ''), COALESCE($5, 'general'),
                     COALESCE($6, 'intermediate'), COALESCE($7, 'general_public'),
                     COALESCE($8, 'question_first'), COALESCE($9, 0),
                     COALESCE($10, '[]'::jsonb), COALESCE($11, '[]'::jsonb),
                     COALESCE($12, '[]'::jsonb), COALESCE($13, 'draft'), COALESCE($14, 'pt-BR'))
             RETURNING {COLUMNS}"
        );
        let set = sqlx::query_as::<_, ContentSet>(&query)
            .bind(&set_number)
            .bind(input.creator_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.difficulty_level)
            .bind(&input.target_audience)
            .bind(&input.content_style)
            .bind(input.estimated_time_minutes)
            .bind(input.tags.as_ref().map(Json))
            .bind(input.prerequisites.as_ref().map(Json))
            .bind(input.learning_outcomes.as_ref().map(Json))
            .bind(&input.status)
            .bind(&input.language)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(set_id = set.id, set_number = %set.set_number, "Created content set");
        Ok(set)
    }

    /// Find a set by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ContentSet>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM content_sets WHERE id = $1");
        sqlx::query_as::<_, ContentSet>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a set by its human-readable number.
    pub async fn find_by_number(
        pool: &PgPool,
        set_number: &str,
    ) -> Result<Option<ContentSet>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM content_sets WHERE set_number = $1");
        sqlx::query_as::<_, ContentSet>(&query)
            .bind(set_number)
            .fetch_optional(pool)
            .await
    }

    /// List sets, newest first, optionally filtered by creator and status.
    pub async fn list(
        pool: &PgPool,
        filter: &ContentSetFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ContentSet>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM content_sets
             WHERE ($1::BIGINT IS NULL OR creator_id = $1)
               AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, ContentSet>(&query)
            .bind(filter.creator_id)
            .bind(&filter.status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a set. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateContentSet,
    ) -> Result<Option<ContentSet>, sqlx::Error> {
        let query = format!(
            "UPDATE content_sets SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                difficulty_level = COALESCE($5, difficulty_level),
                target_audience = COALESCE($6, target_audience),
                content_style = COALESCE($7, content_style),
                estimated_time_minutes = COALESCE($8, estimated_time_minutes),
                tags = COALESCE($9, tags),
                prerequisites = COALESCE($10, prerequisites),
                learning_outcomes = COALESCE($11, learning_outcomes),
                status = COALESCE($12, status),
                language = COALESCE($13, language)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContentSet>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.difficulty_level)
            .bind(&input.target_audience)
            .bind(&input.content_style)
            .bind(input.estimated_time_minutes)
            .bind(input.tags.as_ref().map(Json))
            .bind(input.prerequisites.as_ref().map(Json))
            .bind(input.learning_outcomes.as_ref().map(Json))
            .bind(&input.status)
            .bind(&input.language)
            .fetch_optional(pool)
            .await
    }

    /// Delete a set. Returns `false` if no such set exists.
    ///
    /// Without `cascade`, a set that still has cards is left untouched and
    /// [`CoreError::HasDependents`] is returned.
    pub async fn delete(pool: &PgPool, id: DbId, cascade: bool) -> Result<bool, StoreError> {
        let mut tx = pool.begin().await?;

        let locked =
            sqlx::query_scalar::<_, DbId>("SELECT id FROM content_sets WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(false);
        }

        let dependents =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM content_cards WHERE set_id = $1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        if dependents > 0 && !cascade {
            return Err(CoreError::HasDependents {
                entity: "ContentSet",
                id,
                dependents,
            }
            .into());
        }

        sqlx::query("DELETE FROM content_sets WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }
}
