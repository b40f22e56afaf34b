//! Content card entity model and DTOs.

use boxiii_core::content::{DomainMetadata, MediaAttachment};
use boxiii_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `content_cards` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContentCard {
    pub id: DbId,
    /// Human-readable number within the set, e.g. `c003`.
    pub card_number: String,
    pub set_id: DbId,
    /// Always equal to the owning set's `creator_id`.
    pub creator_id: DbId,
    pub title: String,
    pub summary: String,
    pub detailed_content: Option<String>,
    pub order_index: i32,
    pub domain_data: Json<DomainMetadata>,
    pub media: Json<Vec<MediaAttachment>>,
    pub tags: Json<Vec<String>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for adding one card to an existing set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateContentCard {
    /// When present it must match the set's creator.
    pub creator_id: Option<DbId>,
    pub title: String,
    pub summary: String,
    pub detailed_content: Option<String>,
    /// Defaults to one past the highest index in the set.
    pub order_index: Option<i32>,
    pub domain_data: Option<DomainMetadata>,
    pub media: Option<Vec<MediaAttachment>>,
    pub tags: Option<Vec<String>>,
}

/// Optional filters for the flat card listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentCardFilter {
    pub set_id: Option<DbId>,
    pub creator_id: Option<DbId>,
}

/// DTO for updating a card. Set and creator are fixed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateContentCard {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub detailed_content: Option<String>,
    pub order_index: Option<i32>,
    pub domain_data: Option<DomainMetadata>,
    pub media: Option<Vec<MediaAttachment>>,
    pub tags: Option<Vec<String>>,
}
