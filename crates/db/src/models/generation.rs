//! Batch payload written by the generation orchestrator.

use boxiii_core::card_parser::CardDraft;
use boxiii_core::types::DbId;
use serde::Serialize;

use crate::models::content_card::ContentCard;
use crate::models::content_set::ContentSet;

/// A generated set and its cards, validated and ordered but not yet numbered.
#[derive(Debug, Clone)]
pub struct NewGeneratedSet {
    pub creator_id: DbId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub difficulty_level: String,
    pub content_style: String,
    pub language: String,
    pub tags: Vec<String>,
    pub cards: Vec<CardDraft>,
}

/// Result of a committed batch write.
#[derive(Debug, Clone, Serialize)]
pub struct PersistedSet {
    pub set: ContentSet,
    pub cards: Vec<ContentCard>,
}
