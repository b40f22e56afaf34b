//! Sequence number assignment for sets and cards.
//!
//! Every function runs inside the caller's inserting transaction. The next
//! value is derived from the persisted maximum and the scope's high-water
//! mark; the row holding the mark is locked until the transaction ends, so
//! concurrent requests are serialized per scope. The unique constraints on
//! `set_number` and `(set_id, card_number)` remain the final guard.

use boxiii_core::numbering::{consecutive_after, format_card_number, format_set_number, next_value};
use boxiii_core::types::DbId;
use sqlx::{Postgres, Transaction};

/// `sequence_watermarks.scope` for set numbers.
pub const SET_SCOPE: &str = "content_set";

pub struct NumberingRepo;

impl NumberingRepo {
    /// Reserve the next set number (`sNNN`).
    pub async fn next_set_number(tx: &mut Transaction<'_, Postgres>) -> Result<String, sqlx::Error> {
        // Upsert so the scope row exists and is locked by this transaction.
        let watermark = sqlx::query_scalar::<_, i32>(
            "INSERT INTO sequence_watermarks (scope, last_value) VALUES ($1, 0)
             ON CONFLICT (scope) DO UPDATE SET last_value = sequence_watermarks.last_value
             RETURNING last_value",
        )
        .bind(SET_SCOPE)
        .fetch_one(&mut **tx)
        .await?;

        let max_persisted = sqlx::query_scalar::<_, Option<i32>>(
            "SELECT MAX(SUBSTRING(set_number FROM 2)::INTEGER) FROM content_sets
             WHERE set_number ~ '^s[0-9]+$'",
        )
        .fetch_one(&mut **tx)
        .await?;

        let value = next_value(max_persisted, watermark);
        sqlx::query("UPDATE sequence_watermarks SET last_value = $2 WHERE scope = $1")
            .bind(SET_SCOPE)
            .bind(value)
            .execute(&mut **tx)
            .await?;

        Ok(format_set_number(value))
    }

    /// Reserve `count` consecutive card numbers (`cNNN`) within a set.
    ///
    /// Returns `None` if the set does not exist.
    pub async fn reserve_card_numbers(
        tx: &mut Transaction<'_, Postgres>,
        set_id: DbId,
        count: usize,
    ) -> Result<Option<Vec<String>>, sqlx::Error> {
        let watermark = sqlx::query_scalar::<_, i32>(
            "SELECT last_card_number FROM content_sets WHERE id = $1 FOR UPDATE",
        )
        .bind(set_id)
        .fetch_optional(&mut **tx)
        .await?;
        let Some(watermark) = watermark else {
            return Ok(None);
        };
        if count == 0 {
            return Ok(Some(Vec::new()));
        }

        let max_persisted = sqlx::query_scalar::<_, Option<i32>>(
            "SELECT MAX(SUBSTRING(card_number FROM 2)::INTEGER) FROM content_cards
             WHERE set_id = $1 AND card_number ~ '^c[0-9]+$'",
        )
        .bind(set_id)
        .fetch_one(&mut **tx)
        .await?;

        let last = next_value(max_persisted, watermark) - 1;
        let values: Vec<i32> = consecutive_after(last, count).collect();
        let high = values.last().copied().unwrap_or(last);

        sqlx::query("UPDATE content_sets SET last_card_number = $2 WHERE id = $1")
            .bind(set_id)
            .bind(high)
            .execute(&mut **tx)
            .await?;

        Ok(Some(values.into_iter().map(format_card_number).collect()))
    }
}
