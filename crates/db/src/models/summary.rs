use serde::Serialize;
use sqlx::FromRow;

/// Row counts across the content tables.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DataSummary {
    pub creators: i64,
    pub content_sets: i64,
    pub published_sets: i64,
    pub content_cards: i64,
    /// Creators that own at least one set.
    pub creators_with_sets: i64,
}
