//! Atomic write of one generated set and all of its cards.

use boxiii_core::content::{MINUTES_PER_CARD, SET_STATUS_DRAFT};
use boxiii_core::error::CoreError;
use boxiii_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::error::StoreError;
use crate::models::content_set::ContentSet;
use crate::models::generation::{NewGeneratedSet, PersistedSet};
use crate::repositories::content_card_repo::NewCardRow;
use crate::repositories::content_set_repo::COLUMNS as SET_COLUMNS;
use crate::repositories::{ContentCardRepo, NumberingRepo};

/// Writes orchestrator output.
pub struct GenerationRepo;

impl GenerationRepo {
    /// Persist a generated set and its cards in one transaction.
    ///
    /// Either the set and every card are committed together or nothing is.
    /// A unique violation on a sequence number (a concurrent writer outside
    /// the numbering lock) rolls back and retries, up to `max_attempts`.
    pub async fn persist_generated_set(
        pool: &PgPool,
        input: &NewGeneratedSet,
        max_attempts: u32,
    ) -> Result<PersistedSet, StoreError> {
        let max_attempts = max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match Self::persist_once(pool, input).await {
                Ok(persisted) => return Ok(persisted),
                Err(e) if e.is_unique_violation() && attempt < max_attempts => {
                    tracing::warn!(
                        creator_id = input.creator_id,
                        attempt,
                        error = %e,
                        "Sequence number collision, retrying generated set write"
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn persist_once(pool: &PgPool, input: &NewGeneratedSet) -> Result<PersistedSet, StoreError> {
        let mut tx = pool.begin().await?;

        // Share lock keeps the creator from being deleted mid-write.
        let creator = sqlx::query_scalar::<_, DbId>("SELECT id FROM creators WHERE id = $1 FOR SHARE")
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
        let card_total = i32::try_from(input.cards.len())
            .map_err(|_| CoreError::Validation("Too many cards in one set".to_string()))?;

        let query = format!(
            "INSERT INTO content_sets
                (set_number, creator_id, title, description, category, difficulty_level,
                 content_style, estimated_time_minutes, tags, status, language)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {SET_COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, ContentSet>(&query)
            .bind(&set_number)
            .bind(input.creator_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.difficulty_level)
            .bind(&input.content_style)
            .bind(card_total * MINUTES_PER_CARD)
            .bind(Json(&input.tags))
            .bind(SET_STATUS_DRAFT)
            .bind(&input.language)
            .fetch_one(&mut *tx)
            .await?;

        let numbers = NumberingRepo::reserve_card_numbers(&mut tx, inserted.id, input.cards.len())
            .await?
            .ok_or(CoreError::NotFound {
                entity: "ContentSet",
                id: inserted.id,
            })?;

        let mut cards = Vec::with_capacity(input.cards.len());
        for (draft, card_number) in input.cards.iter().zip(&numbers) {
            let card = ContentCardRepo::insert_inner(
                &mut tx,
                &NewCardRow {
                    card_number,
                    set_id: inserted.id,
                    creator_id: inserted.creator_id,
                    title: &draft.title,
                    summary: &draft.summary,
                    detailed_content: draft.detailed_content.as_deref(),
                    order_index: draft.order_index,
                    domain_data: &draft.domain_data,
                    media: &draft.media,
                    tags: &draft.tags,
                },
            )
            .await?;
            cards.push(card);
        }

        ContentCardRepo::refresh_card_count(&mut tx, inserted.id).await?;
        let set = sqlx::query_as::<_, ContentSet>(&format!(
            "SELECT {SET_COLUMNS} FROM content_sets WHERE id = $1"
        ))
        .bind(inserted.id)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        tracing::info!(
            set_id = set.id,
            set_number = %set.set_number,
            cards = set.card_count,
            "Persisted generated set"
        );
        Ok(PersistedSet { set, cards })
    }
}
