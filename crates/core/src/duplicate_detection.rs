//! Duplicate suppression for generated cards.
//!
//! A candidate's identity is its normalized `title + summary`. Exact
//! fingerprint matches are always duplicates; when the configured threshold
//! is below 1.0, token-set Jaccard similarity at or above it also counts.

use std::collections::{BTreeSet, HashSet};

use crate::error::CoreError;
use crate::hashing::sha256_hex;

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.90;
pub const MIN_SIMILARITY_THRESHOLD: f64 = 0.50;
pub const MAX_SIMILARITY_THRESHOLD: f64 = 1.00;

/// Lowercase and collapse every whitespace run into a single space.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// SHA-256 fingerprint of the normalized `title` and `summary`.
pub fn content_fingerprint(title: &str, summary: &str) -> String {
    let normalized = format!("{}\n{}", normalize_text(title), normalize_text(summary));
    sha256_hex(normalized.as_bytes())
}

/// Word tokens of the normalized text with surrounding punctuation removed.
fn token_set(title: &str, summary: &str) -> BTreeSet<String> {
    normalize_text(&format!("{title} {summary}"))
        .split(' ')
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Jaccard similarity of two token sets. Two empty sets are identical.
pub fn jaccard_similarity(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count() as f64;
    let union = a.union(b).count() as f64;
    intersection / union
}

/// Validate that `threshold` is within `[MIN, MAX]`.
pub fn validate_threshold(threshold: f64) -> Result<(), CoreError> {
    if !(MIN_SIMILARITY_THRESHOLD..=MAX_SIMILARITY_THRESHOLD).contains(&threshold) {
        return Err(CoreError::Validation(format!(
            "Similarity threshold must be between {MIN_SIMILARITY_THRESHOLD} and {MAX_SIMILARITY_THRESHOLD}, got {threshold}"
        )));
    }
    Ok(())
}

/// Why a candidate was judged a duplicate.
#[derive(Debug, Clone, PartialEq)]
pub enum DuplicateMatch {
    /// Identical normalized text.
    Exact { of_index: usize },
    /// Token overlap at or above the threshold.
    Similar { of_index: usize, similarity: f64 },
}

impl DuplicateMatch {
    /// Position (in acceptance order) of the earlier candidate that was kept.
    pub fn of_index(&self) -> usize {
        match self {
            Self::Exact { of_index } | Self::Similar { of_index, .. } => *of_index,
        }
    }
}

/// Tracks the candidates accepted so far within one batch.
#[derive(Debug)]
pub struct DuplicateDetector {
    threshold: f64,
    fingerprints: HashSet<String>,
    accepted: Vec<(String, BTreeSet<String>, usize)>,
}

impl DuplicateDetector {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(MIN_SIMILARITY_THRESHOLD, MAX_SIMILARITY_THRESHOLD),
            fingerprints: HashSet::new(),
            accepted: Vec::new(),
        }
    }

    /// Check a candidate against everything accepted so far. When it is not
    /// a duplicate it is recorded under `index` and `None` is returned.
    pub fn check_and_insert(
        &mut self,
        index: usize,
        title: &str,
        summary: &str,
    ) -> Option<DuplicateMatch> {
        let fingerprint = content_fingerprint(title, summary);
        if self.fingerprints.contains(&fingerprint) {
            let of_index = self
                .accepted
                .iter()
                .find(|(fp, _, _)| *fp == fingerprint)
                .map_or(0, |(_, _, i)| *i);
            return Some(DuplicateMatch::Exact { of_index });
        }

        let tokens = token_set(title, summary);
        if self.threshold < MAX_SIMILARITY_THRESHOLD {
            let closest = self
                .accepted
                .iter()
                .map(|(_, other, i)| (jaccard_similarity(&tokens, other), *i))
                .filter(|(sim, _)| *sim >= self.threshold)
                .max_by(|a, b| a.0.total_cmp(&b.0));
            if let Some((similarity, of_index)) = closest {
                return Some(DuplicateMatch::Similar {
                    of_index,
                    similarity,
                });
            }
        }

        self.fingerprints.insert(fingerprint.clone());
        self.accepted.push((fingerprint, tokens, index));
        None
    }
}
