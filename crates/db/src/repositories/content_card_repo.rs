//! Repository for the `content_cards` table.
//!
//! Every insert and delete recomputes the parent set's `card_count` in the
//! same transaction, with the set row locked first.

use boxiii_core::content::{DomainMetadata, MediaAttachment};
use boxiii_core::error::CoreError;
use boxiii_core::types::DbId;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::StoreError;
use crate::models::content_card::{
    ContentCard, ContentCardFilter, CreateContentCard, UpdateContentCard,
};
use crate::repositories::NumberingRepo;

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, card_number, set_id, creator_id, title, summary, \
     detailed_content, order_index, domain_data, media, tags, created_at, updated_at";

/// Provides CRUD operations for content cards.
pub struct ContentCardRepo;

impl ContentCardRepo {
    /// Add one card to an existing set.
    ///
    /// Fails with [`CoreError::NotFound`] if the set does not exist and with
    /// [`CoreError::Validation`] if `input.creator_id` differs from the
    /// set's creator.
    pub async fn create(
        pool: &PgPool,
        set_id: DbId,
        input: &CreateContentCard,
    ) -> Result<ContentCard, StoreError> {
        let mut tx = pool.begin().await?;

        let set_creator = sqlx::query_scalar::<_, DbId>(
            "SELECT creator_id FROM content_sets WHERE id = $1 FOR UPDATE",
        )
        .bind(set_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ContentSet",
            id: set_id,
        })?;

        if let Some(creator_id) = input.creator_id {
            if creator_id != set_creator {
                return Err(CoreError::Validation(format!(
                    "Card creator {creator_id} does not match creator {set_creator} of set {set_id}"
                ))
                .into());
            }
        }

        let card_number = NumberingRepo::reserve_card_numbers(&mut tx, set_id, 1)
            .await?
            .and_then(|numbers| numbers.into_iter().next())
            .ok_or(CoreError::NotFound {
                entity: "ContentSet",
                id: set_id,
            })?;

        let order_index = match input.order_index {
            Some(index) => index,
            None => {
                sqlx::query_scalar::<_, i32>(
                    "SELECT COALESCE(MAX(order_index) + 1, 0) FROM content_cards WHERE set_id = $1",
                )
                .bind(set_id)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        let domain_data = input.domain_data.clone().unwrap_or_default();
        let card = Self::insert_inner(
            &mut tx,
            &NewCardRow {
                card_number: &card_number,
                set_id,
                creator_id: set_creator,
                title: &input.title,
                summary: &input.summary,
                detailed_content: input.detailed_content.as_deref(),
                order_index,
                domain_data: &domain_data,
                media: input.media.as_deref().unwrap_or_default(),
                tags: input.tags.as_deref().unwrap_or_default(),
            },
        )
        .await?;

        Self::refresh_card_count(&mut tx, set_id).await?;
        tx.commit().await?;
        Ok(card)
    }

    /// Find a card by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ContentCard>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM content_cards WHERE id = $1");
        sqlx::query_as::<_, ContentCard>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all cards of a set in display order.
    pub async fn list_by_set(pool: &PgPool, set_id: DbId) -> Result<Vec<ContentCard>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM content_cards
             WHERE set_id = $1
             ORDER BY order_index ASC, id ASC"
        );
        sqlx::query_as::<_, ContentCard>(&query)
            .bind(set_id)
            .fetch_all(pool)
            .await
    }

    /// List cards across sets, newest first, optionally filtered by set and
    /// creator.
    pub async fn list(
        pool: &PgPool,
        filter: &ContentCardFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ContentCard>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM content_cards
             WHERE ($1::BIGINT IS NULL OR set_id = $1)
               AND ($2::BIGINT IS NULL OR creator_id = $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, ContentCard>(&query)
            .bind(filter.set_id)
            .bind(filter.creator_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a card. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists. Moving a card to
    /// an `order_index` already used in its set violates
    /// `uq_content_cards_set_order`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateContentCard,
    ) -> Result<Option<ContentCard>, sqlx::Error> {
        let query = format!(
            "UPDATE content_cards SET
                title = COALESCE($2, title),
                summary = COALESCE($3, summary),
                detailed_content = COALESCE($4, detailed_content),
                order_index = COALESCE($5, order_index),
                domain_data = COALESCE($6, domain_data),
                media = COALESCE($7, media),
                tags = COALESCE($8, tags)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContentCard>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.summary)
            .bind(&input.detailed_content)
            .bind(input.order_index)
            .bind(input.domain_data.as_ref().map(Json))
            .bind(input.media.as_ref().map(Json))
            .bind(input.tags.as_ref().map(Json))
            .fetch_optional(pool)
            .await
    }

    /// Delete a card and recompute its set's count. Returns `false` if no
    /// such card exists.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let set_id = sqlx::query_scalar::<_, DbId>(
            "SELECT s.id FROM content_sets s
             JOIN content_cards c ON c.set_id = s.id
             WHERE c.id = $1
             FOR UPDATE OF s",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(set_id) = set_id else {
            return Ok(false);
        };

        let result = sqlx::query("DELETE FROM content_cards WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        Self::refresh_card_count(&mut tx, set_id).await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Recompute a set's `card_count` from its actual children.
    pub(crate) async fn refresh_card_count(
        tx: &mut Transaction<'_, Postgres>,
        set_id: DbId,
    ) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE content_sets
             SET card_count = (SELECT COUNT(*) FROM content_cards WHERE set_id = $1)::INTEGER
             WHERE id = $1
             RETURNING card_count",
        )
        .bind(set_id)
        .fetch_one(&mut **tx)
        .await
    }

    /// Insert one fully specified card row.
    pub(crate) async fn insert_inner(
        tx: &mut Transaction<'_, Postgres>,
        row: &NewCardRow<'_>,
    ) -> Result<ContentCard, sqlx::Error> {
        let query = format!(
            "INSERT INTO content_cards
                (card_number, set_id, creator_id, title, summary, detailed_content,
                 order_index, domain_data, media, tags)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContentCard>(&query)
            .bind(row.card_number)
            .bind(row.set_id)
            .bind(row.creator_id)
            .bind(row.title)
            .bind(row.summary)
            .bind(row.detailed_content)
            .bind(row.order_index)
            .bind(Json(row.domain_data))
            .bind(Json(row.media))
            .bind(Json(row.tags))
            .fetch_one(&mut **tx)
            .await
    }
}

/// Borrowed column values for one card insert.
pub(crate) struct NewCardRow<'a> {
    pub card_number: &'a str,
    pub set_id: DbId,
    pub creator_id: DbId,
    pub title: &'a str,
    pub summary: &'a str,
    pub detailed_content: Option<&'a str>,
    pub order_index: i32,
    pub domain_data: &'a DomainMetadata,
    pub media: &'a [MediaAttachment],
    pub tags: &'a [String],
}
