//! Generation request validation, stage tracking, and wire error codes.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::content::require_non_blank;
use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Fewest cards a single generation run may request.
pub const MIN_CARD_COUNT: u32 = 3;
/// Most cards a single generation run may request.
pub const MAX_CARD_COUNT: u32 = 20;
/// Default minimum share of requested cards that must survive validation.
pub const DEFAULT_MIN_SURVIVOR_FRACTION: f64 = 0.5;
/// Default content style when the request does not name one.
pub const DEFAULT_GENERATION_STYLE: &str = "educational";

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// A generation request as submitted by the admin UI.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerationRequest {
    pub creator_id: DbId,
    #[validate(length(min = 1, max = 200))]
    pub topic: String,
    /// Provider registry key, e.g. `"claude"`.
    #[validate(length(min = 1, max = 50))]
    pub provider: String,
    #[validate(range(min = 3, max = 20))]
    pub card_count: u32,
    #[serde(default)]
    pub style: Option<String>,
    /// Set category; defaults to `general`.
    #[serde(default)]
    pub category: Option<String>,
    /// Set language; defaults to `pt-BR`.
    #[serde(default)]
    pub language: Option<String>,
}

impl GenerationRequest {
    /// The effective content style for this request.
    pub fn style_or_default(&self) -> &str {
        self.style
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_GENERATION_STYLE)
    }
}

/// Reject caller errors before any provider call is made.
pub fn validate_generation_request(request: &GenerationRequest) -> Result<(), CoreError> {
    request
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;
    require_non_blank("topic", &request.topic)?;
    require_non_blank("provider", &request.provider)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// Lifecycle of one generation request.
///
/// `Requested -> Prompting -> CallingProvider -> Parsing -> AssigningNumbers
/// -> Persisting -> Completed | Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStage {
    Requested,
    Prompting,
    CallingProvider,
    Parsing,
    AssigningNumbers,
    Persisting,
    Completed,
    Failed,
}

impl GenerationStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::Prompting => "prompting",
            Self::CallingProvider => "calling_provider",
            Self::Parsing => "parsing",
            Self::AssigningNumbers => "assigning_numbers",
            Self::Persisting => "persisting",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_advance_to(self, next: GenerationStage) -> bool {
        use GenerationStage::*;
        match (self, next) {
            (Completed | Failed, _) => false,
            (_, Failed) => true,
            (Requested, Prompting)
            | (Prompting, CallingProvider)
            | (CallingProvider, Parsing)
            | (Parsing, AssigningNumbers)
            | (AssigningNumbers, Persisting)
            | (Persisting, Completed) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Error codes
// ---------------------------------------------------------------------------

/// The `error` field of a failed generation response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationErrorCode {
    InvalidRequest,
    InvalidCreator,
    ProviderAuthFailure,
    ProviderRateLimited,
    ProviderTimeout,
    ProviderUnavailable,
    ParseFailure,
    InsufficientValidCards,
    PersistenceFailure,
}

impl GenerationErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::InvalidCreator => "invalid_creator",
            Self::ProviderAuthFailure => "provider_auth_failure",
            Self::ProviderRateLimited => "provider_rate_limited",
            Self::ProviderTimeout => "provider_timeout",
            Self::ProviderUnavailable => "provider_unavailable",
            Self::ParseFailure => "parse_failure",
            Self::InsufficientValidCards => "insufficient_valid_cards",
            Self::PersistenceFailure => "persistence_failure",
        }
    }
}

impl std::fmt::Display for GenerationErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
