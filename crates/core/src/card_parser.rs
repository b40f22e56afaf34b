//! Response parser and validator for provider output.
//!
//! Turns raw model text into an ordered list of card drafts:
//!
//! 1. Extract candidate objects (bare JSON, fenced JSON, or JSON embedded in
//!    prose). Zero candidates is a [`ParseError::NoCandidates`].
//! 2. Skip candidates without a non-empty `title` and `summary`.
//! 3. Drop duplicates by normalized-text fingerprint (and optionally by
//!    similarity).
//! 4. Fail with [`ParseError::InsufficientValidCards`] when survivors fall
//!    below the configured share of the requested count.
//! 5. Normalize survivors into [`CardDraft`]s.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::content::{normalize_tags, DomainMetadata, MediaAttachment};
use crate::duplicate_detection::{DuplicateDetector, DuplicateMatch};
use crate::types::Timestamp;

/// Object keys that may wrap the card list.
const LIST_KEYS: &[&str] = &["cards", "content_cards", "items", "data"];
/// Accepted spellings of the long-form body.
const BODY_KEYS: &[&str] = &["detailed_content", "body", "content", "details"];

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z]*\s*(.*?)```").expect("valid code fence regex")
});

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Missing title/summary or not an object.
    SkippedInvalid,
    /// Same content as a card already accepted in this batch.
    DuplicateDropped,
    /// More valid cards than requested; the tail was discarded.
    ExtraCandidateIgnored,
}

/// A non-fatal problem found while parsing one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationWarning {
    pub kind: WarningKind,
    /// Zero-based position of the candidate in the provider output.
    pub candidate_index: usize,
    pub message: String,
}

/// Validation knobs for one batch.
#[derive(Debug, Clone, Copy)]
pub struct ParsePolicy {
    pub requested: usize,
    /// Survivors below `requested * min_survivor_fraction` fail the batch.
    pub min_survivor_fraction: f64,
    /// `1.0` means exact fingerprint matching only.
    pub similarity_threshold: f64,
}

impl ParsePolicy {
    /// Smallest number of survivors that still passes.
    pub fn minimum_survivors(&self) -> usize {
        let min = (self.requested as f64 * self.min_survivor_fraction).ceil() as usize;
        min.max(1)
    }
}

/// One candidate that passed structural validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateCard {
    pub title: String,
    pub summary: String,
    pub detailed_content: Option<String>,
    pub tags: Vec<String>,
    pub difficulty: Option<String>,
    pub guidance: Option<String>,
}

/// Context stamped into every generated card's domain metadata.
#[derive(Debug, Clone)]
pub struct DraftContext {
    pub topic: String,
    pub style: String,
    pub provider: String,
    pub model: String,
    pub generated_at: Timestamp,
}

/// A card in the stored attribute shape, ready for numbering and insert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardDraft {
    pub title: String,
    pub summary: String,
    pub detailed_content: Option<String>,
    pub order_index: i32,
    pub domain_data: DomainMetadata,
    pub media: Vec<MediaAttachment>,
    pub tags: Vec<String>,
}

impl CandidateCard {
    pub fn into_draft(self, context: &DraftContext, order_index: i32) -> CardDraft {
        CardDraft {
            title: self.title,
            summary: self.summary,
            detailed_content: self.detailed_content,
            order_index,
            domain_data: DomainMetadata {
                topic: Some(context.topic.clone()),
                difficulty: self.difficulty,
                guidance: self.guidance,
                style: Some(context.style.clone()),
                ai_provider: Some(context.provider.clone()),
                model: Some(context.model.clone()),
                generated_at: Some(context.generated_at),
                extra: serde_json::Map::new(),
            },
            media: Vec::new(),
            tags: self.tags,
        }
    }
}

/// Result of a batch that passed validation.
#[derive(Debug, Clone)]
pub struct ParsedBatch {
    pub cards: Vec<CandidateCard>,
    pub warnings: Vec<GenerationWarning>,
    /// Candidates extracted before validation.
    pub candidates_found: usize,
}

impl ParsedBatch {
    /// Convert survivors into drafts with `order_index` 0, 1, 2, ...
    pub fn into_drafts(self, context: &DraftContext) -> (Vec<CardDraft>, Vec<GenerationWarning>) {
        let drafts = self
            .cards
            .into_iter()
            .enumerate()
            .map(|(i, card)| card.into_draft(context, i as i32))
            .collect();
        (drafts, self.warnings)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    #[error("No card candidates could be extracted from provider output: {reason}")]
    NoCandidates { reason: String },

    #[error("Only {survivors} valid card(s) out of {requested} requested (minimum {minimum})")]
    InsufficientValidCards {
        survivors: usize,
        requested: usize,
        minimum: usize,
        warnings: Vec<GenerationWarning>,
    },
}

impl ParseError {
    /// Warnings collected before the batch was rejected.
    pub fn warnings(&self) -> &[GenerationWarning] {
        match self {
            Self::NoCandidates { .. } => &[],
            Self::InsufficientValidCards { warnings, .. } => warnings,
        }
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Parse the first JSON document found in `raw`.
fn extract_json(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }

    if let Some(fenced) = CODE_FENCE.captures(trimmed).and_then(|c| c.get(1)) {
        if let Ok(value) = serde_json::from_str::<Value>(fenced.as_str().trim()) {
            return Some(value);
        }
    }

    // JSON embedded in prose: try the widest object and array spans, the one
    // that opens first wins.
    let mut spans: Vec<(usize, usize)> = [('{', '}'), ('[', ']')]
        .iter()
        .filter_map(|(open, close)| {
            let start = trimmed.find(*open)?;
            let end = trimmed.rfind(*close)?;
            (end > start).then_some((start, end))
        })
        .collect();
    spans.sort_unstable();
    spans
        .into_iter()
        .find_map(|(start, end)| serde_json::from_str::<Value>(&trimmed[start..=end]).ok())
}

/// Pull the candidate list out of a parsed document.
fn candidate_values(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            for key in LIST_KEYS {
                if let Some(Value::Array(items)) = map.remove(*key) {
                    return items;
                }
            }
            if map.contains_key("title") {
                vec![Value::Object(map)]
            } else {
                Vec::new()
            }
        }
        _ => Vec::new(),
    }
}

/// Extract the raw candidate objects from provider output.
pub fn extract_candidates(raw: &str) -> Result<Vec<Value>, ParseError> {
    if raw.trim().is_empty() {
        return Err(ParseError::NoCandidates {
            reason: "empty response".to_string(),
        });
    }
    let value = extract_json(raw).ok_or_else(|| ParseError::NoCandidates {
        reason: "no JSON document found".to_string(),
    })?;
    let candidates = candidate_values(value);
    if candidates.is_empty() {
        return Err(ParseError::NoCandidates {
            reason: "JSON contained no card list".to_string(),
        });
    }
    Ok(candidates)
}

// ---------------------------------------------------------------------------
// Field access
// ---------------------------------------------------------------------------

fn text_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn tags_field(obj: &serde_json::Map<String, Value>) -> Vec<String> {
    match obj.get("tags") {
        Some(Value::Array(items)) => normalize_tags(items.iter().filter_map(Value::as_str)),
        Some(Value::String(s)) => normalize_tags(s.split(',')),
        _ => Vec::new(),
    }
}

/// Validate one candidate, returning the reason it was skipped on failure.
fn validate_candidate(value: &Value) -> Result<CandidateCard, String> {
    let obj = value
        .as_object()
        .ok_or_else(|| "candidate is not a JSON object".to_string())?;

    let title = text_field(obj, "title");
    let summary = text_field(obj, "summary");
    let (title, summary) = match (title, summary) {
        (Some(t), Some(s)) => (t, s),
        (None, Some(_)) => return Err("missing title".to_string()),
        (Some(_), None) => return Err("missing summary".to_string()),
        (None, None) => return Err("missing title and summary".to_string()),
    };

    Ok(CandidateCard {
        title,
        summary,
        detailed_content: BODY_KEYS.iter().find_map(|k| text_field(obj, k)),
        tags: tags_field(obj),
        difficulty: text_field(obj, "difficulty"),
        guidance: text_field(obj, "guidance"),
    })
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Parse and validate one batch of provider output.
pub fn parse_cards(raw: &str, policy: &ParsePolicy) -> Result<ParsedBatch, ParseError> {
    let candidates = extract_candidates(raw)?;
    let candidates_found = candidates.len();

    let mut detector = DuplicateDetector::new(policy.similarity_threshold);
    let mut warnings = Vec::new();
    let mut cards = Vec::new();

    for (index, value) in candidates.iter().enumerate() {
        let card = match validate_candidate(value) {
            Ok(card) => card,
            Err(reason) => {
                warnings.push(GenerationWarning {
                    kind: WarningKind::SkippedInvalid,
                    candidate_index: index,
                    message: format!("Skipped card {}: {reason}", index + 1),
                });
                continue;
            }
        };

        if let Some(hit) = detector.check_and_insert(index, &card.title, &card.summary) {
            let message = match hit {
                DuplicateMatch::Exact { of_index } => format!(
                    "Duplicate content dropped: card {} repeats card {}",
                    index + 1,
                    of_index + 1
                ),
                DuplicateMatch::Similar {
                    of_index,
                    similarity,
                } => format!(
                    "Duplicate content dropped: card {} is {:.0}% similar to card {}",
                    index + 1,
                    similarity * 100.0,
                    of_index + 1
                ),
            };
            warnings.push(GenerationWarning {
                kind: WarningKind::DuplicateDropped,
                candidate_index: index,
                message,
            });
            continue;
        }

        if cards.len() >= policy.requested {
            warnings.push(GenerationWarning {
                kind: WarningKind::ExtraCandidateIgnored,
                candidate_index: index,
                message: format!(
                    "Ignored card {}: {} cards were requested",
                    index + 1,
                    policy.requested
                ),
            });
            continue;
        }

        cards.push(card);
    }

    let minimum = policy.minimum_survivors();
    if cards.len() < minimum {
        return Err(ParseError::InsufficientValidCards {
            survivors: cards.len(),
            requested: policy.requested,
            minimum,
            warnings,
        });
    }

    Ok(ParsedBatch {
        cards,
        warnings,
        candidates_found,
    })
}
