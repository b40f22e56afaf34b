//! Content vocabulary shared by creators, sets, and cards.
//!
//! Status / difficulty constants, platform handle validation, and the typed
//! shapes of the flexible JSON columns (media attachments, domain metadata).
//! No database access.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Publish status
// ---------------------------------------------------------------------------

pub const SET_STATUS_DRAFT: &str = "draft";
pub const SET_STATUS_PUBLISHED: &str = "published";
pub const SET_STATUS_ARCHIVED: &str = "archived";
pub const VALID_SET_STATUSES: &[&str] = &[SET_STATUS_DRAFT, SET_STATUS_PUBLISHED, SET_STATUS_ARCHIVED];

// ---------------------------------------------------------------------------
// Difficulty
// ---------------------------------------------------------------------------

pub const DIFFICULTY_BEGINNER: &str = "beginner";
pub const DIFFICULTY_INTERMEDIATE: &str = "intermediate";
pub const DIFFICULTY_ADVANCED: &str = "advanced";
pub const VALID_DIFFICULTY_LEVELS: &[&str] =
    &[DIFFICULTY_BEGINNER, DIFFICULTY_INTERMEDIATE, DIFFICULTY_ADVANCED];

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_TARGET_AUDIENCE: &str = "general_public";
pub const DEFAULT_SET_CONTENT_STYLE: &str = "question_first";
pub const DEFAULT_CREATOR_CONTENT_STYLE: &str = "educational";
pub const DEFAULT_LANGUAGE: &str = "pt-BR";
pub const DEFAULT_CATEGORY: &str = "general";

/// Reading-time estimate used when a set is produced by generation.
pub const MINUTES_PER_CARD: i32 = 5;

// ---------------------------------------------------------------------------
// Platforms
// ---------------------------------------------------------------------------

pub const SUPPORTED_PLATFORMS: &[&str] = &[
    "youtube",
    "instagram",
    "tiktok",
    "twitter",
    "linkedin",
    "website",
    "facebook",
    "twitch",
];

/// Characters that break platform profile URLs.
const FORBIDDEN_HANDLE_CHARS: &[char] = &[' ', '\t', '\n', '@', '#', '&', '?', '=', '+', '%'];

/// One `(platform, handle)` pair on a creator profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformHandle {
    pub platform: String,
    pub handle: String,
}

impl PlatformHandle {
    /// Validate and normalize: platform lowercased and checked against
    /// [`SUPPORTED_PLATFORMS`], handle trimmed and free of URL-breaking characters.
    pub fn normalized(&self) -> Result<Self, CoreError> {
        let platform = self.platform.trim().to_lowercase();
        if !SUPPORTED_PLATFORMS.contains(&platform.as_str()) {
            return Err(CoreError::Validation(format!(
                "Platform '{}' is not supported. Valid platforms: {}",
                self.platform,
                SUPPORTED_PLATFORMS.join(", ")
            )));
        }

        let handle = self.handle.trim();
        if handle.is_empty() {
            return Err(CoreError::Validation(
                "Platform handle cannot be empty".to_string(),
            ));
        }
        if handle.contains(FORBIDDEN_HANDLE_CHARS) {
            return Err(CoreError::Validation(format!(
                "Platform handle '{handle}' cannot contain spaces or any of: @ # & ? = + %"
            )));
        }

        Ok(Self {
            platform,
            handle: handle.to_string(),
        })
    }
}

/// Normalize every platform entry, failing on the first invalid one.
pub fn normalize_platforms(platforms: &[PlatformHandle]) -> Result<Vec<PlatformHandle>, CoreError> {
    platforms.iter().map(PlatformHandle::normalized).collect()
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

/// Validate that `status` is one of [`VALID_SET_STATUSES`].
pub fn validate_set_status(status: &str) -> Result<(), CoreError> {
    if VALID_SET_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid status '{status}'. Must be one of: {}",
            VALID_SET_STATUSES.join(", ")
        )))
    }
}

/// Validate that `level` is one of [`VALID_DIFFICULTY_LEVELS`].
pub fn validate_difficulty(level: &str) -> Result<(), CoreError> {
    if VALID_DIFFICULTY_LEVELS.contains(&level) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid difficulty level '{level}'. Must be one of: {}",
            VALID_DIFFICULTY_LEVELS.join(", ")
        )))
    }
}

/// Reject blank required text fields.
pub fn require_non_blank(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        Err(CoreError::Validation(format!("{field} must not be empty")))
    } else {
        Ok(())
    }
}

/// Trim tags, drop empties, and remove case-insensitive repeats (first wins).
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = std::collections::HashSet::new();
    tags.into_iter()
        .filter_map(|t| {
            let trimmed = t.as_ref().trim();
            if trimmed.is_empty() || !seen.insert(trimmed.to_lowercase()) {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Media attachments
// ---------------------------------------------------------------------------

/// Fields common to every media attachment kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDetails {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A media item attached to a card, stored in the `media` JSONB column as
/// `{"media_type": "video", "url": ..., "title": ..., "description": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "media_type", rename_all = "snake_case")]
pub enum MediaAttachment {
    Video(MediaDetails),
    Image(MediaDetails),
    Embed(MediaDetails),
    Link(MediaDetails),
}

impl MediaAttachment {
    pub fn details(&self) -> &MediaDetails {
        match self {
            Self::Video(d) | Self::Image(d) | Self::Embed(d) | Self::Link(d) => d,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Video(_) => "video",
            Self::Image(_) => "image",
            Self::Embed(_) => "embed",
            Self::Link(_) => "link",
        }
    }

    /// Every attachment needs an absolute http(s) URL.
    pub fn validate(&self) -> Result<(), CoreError> {
        let url = self.details().url.trim();
        if url.starts_with("https://") || url.starts_with("http://") {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "{} attachment URL must start with http:// or https://, got '{url}'",
                self.kind()
            )))
        }
    }
}

/// Validate a full media list.
pub fn validate_media(media: &[MediaAttachment]) -> Result<(), CoreError> {
    media.iter().try_for_each(MediaAttachment::validate)
}

// ---------------------------------------------------------------------------
// Domain metadata
// ---------------------------------------------------------------------------

/// Card-level metadata stored in the `domain_data` JSONB column.
///
/// Known keys are typed; anything else round-trips through `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guidance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<Timestamp>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
