//! Creator entity model and DTOs.

use boxiii_core::content::PlatformHandle;
use boxiii_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `creators` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Creator {
    pub id: DbId,
    pub display_name: String,
    pub description: String,
    pub platforms: Json<Vec<PlatformHandle>>,
    pub categories: Vec<String>,
    /// Usual voice; modulates prompt tone only.
    pub content_style: String,
    pub expertise_areas: Vec<String>,
    pub avatar_url: Option<String>,
    pub banner_url: Option<String>,
    pub follower_count: i64,
    pub verified: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a creator. Platforms must already be normalized.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCreator {
    pub display_name: String,
    pub description: Option<String>,
    pub platforms: Option<Vec<PlatformHandle>>,
    pub categories: Option<Vec<String>>,
    /// Defaults to `educational`.
    pub content_style: Option<String>,
    pub expertise_areas: Option<Vec<String>>,
    pub avatar_url: Option<String>,
    pub banner_url: Option<String>,
    pub follower_count: Option<i64>,
    pub verified: Option<bool>,
}

/// DTO for updating a creator. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCreator {
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub platforms: Option<Vec<PlatformHandle>>,
    pub categories: Option<Vec<String>>,
    pub content_style: Option<String>,
    pub expertise_areas: Option<Vec<String>>,
    pub avatar_url: Option<String>,
    pub banner_url: Option<String>,
    pub follower_count: Option<i64>,
    pub verified: Option<bool>,
}
