//! Content set ("box") entity model and DTOs.

use boxiii_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `content_sets` table.
///
/// `card_count` is derived and maintained by the card repository; it is not
/// part of any update DTO.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContentSet {
    pub id: DbId,
    /// Human-readable number, e.g. `s007`. Assigned once, never reused.
    pub set_number: String,
    pub creator_id: DbId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub difficulty_level: String,
    pub target_audience: String,
    pub content_style: String,
    pub card_count: i32,
    pub estimated_time_minutes: i32,
    pub tags: Json<Vec<String>>,
    pub prerequisites: Json<Vec<String>>,
    pub learning_outcomes: Json<Vec<String>>,
    pub status: String,
    pub language: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a set manually. The set number is assigned on insert.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateContentSet {
    pub creator_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub difficulty_level: Option<String>,
    pub target_audience: Option<String>,
    pub content_style: Option<String>,
    pub estimated_time_minutes: Option<i32>,
    pub tags: Option<Vec<String>>,
    pub prerequisites: Option<Vec<String>>,
    pub learning_outcomes: Option<Vec<String>>,
    pub status: Option<String>,
    pub language: Option<String>,
}

/// DTO for updating a set. The owning creator cannot be changed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateContentSet {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub difficulty_level: Option<String>,
    pub target_audience: Option<String>,
    pub content_style: Option<String>,
    pub estimated_time_minutes: Option<i32>,
    pub tags: Option<Vec<String>>,
    pub prerequisites: Option<Vec<String>>,
    pub learning_outcomes: Option<Vec<String>>,
    pub status: Option<String>,
    pub language: Option<String>,
}

/// Optional filters for listing sets.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentSetFilter {
    pub creator_id: Option<DbId>,
    pub status: Option<String>,
}
