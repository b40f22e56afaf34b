//! Aggregate counts for the data summary endpoint.

use boxiii_core::content::SET_STATUS_PUBLISHED;
use sqlx::PgPool;

use crate::models::summary::DataSummary;

pub struct SummaryRepo;

impl SummaryRepo {
    pub async fn counts(pool: &PgPool) -> Result<DataSummary, sqlx::Error> {
        sqlx::query_as::<_, DataSummary>(
            "SELECT
                (SELECT COUNT(*) FROM creators) AS creators,
                (SELECT COUNT(*) FROM content_sets) AS content_sets,
                (SELECT COUNT(*) FROM content_sets WHERE status = $1) AS published_sets,
                (SELECT COUNT(*) FROM content_cards) AS content_cards,
                (SELECT COUNT(DISTINCT creator_id) FROM content_sets) AS creators_with_sets",
        )
        .bind(SET_STATUS_PUBLISHED)
        .fetch_one(pool)
        .await
    }
}
