//! The generation state machine.

use std::sync::Arc;
use std::time::Duration;

use boxiii_core::card_parser::{parse_cards, DraftContext, GenerationWarning, ParseError, ParsePolicy};
use boxiii_core::content::{DEFAULT_CATEGORY, DEFAULT_LANGUAGE, DIFFICULTY_INTERMEDIATE};
use boxiii_core::error::CoreError;
use boxiii_core::generation::{
    validate_generation_request, GenerationErrorCode, GenerationRequest, GenerationStage,
};
use boxiii_core::prompt::{build_prompt, Prompt};
use boxiii_core::types::DbId;
use boxiii_db::models::generation::NewGeneratedSet;
use boxiii_db::StoreError;
use boxiii_llm::{ContentProvider, ProviderError, ProviderRegistry, ProviderResponse, TokenUsage};
use serde::Serialize;
use tracing::Instrument;

use crate::config::GenerationConfig;
use crate::store::GenerationStore;

/// First call plus one retry.
const MAX_PROVIDER_ATTEMPTS: u32 = 2;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Outcome of a completed generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationSummary {
    pub set_id: DbId,
    pub set_number: String,
    pub cards_requested: u32,
    /// May be below `cards_requested` when candidates were dropped.
    pub cards_generated: usize,
    pub warnings: Vec<GenerationWarning>,
    pub provider: String,
    pub model: String,
    pub usage: Option<TokenUsage>,
    pub estimated_cost_usd: Option<f64>,
}

/// Terminal failure of a generation run. Nothing was persisted.
#[derive(Debug, Clone, thiserror::Error)]
#[error("generation failed at {stage} ({code}): {message}")]
pub struct GenerationError {
    pub code: GenerationErrorCode,
    /// Last stage entered before the failure.
    pub stage: GenerationStage,
    pub message: String,
    /// Parser warnings collected before the failure, if parsing ran.
    pub warnings: Vec<GenerationWarning>,
}

/// Map an adapter failure to its wire code.
pub fn provider_error_code(err: &ProviderError) -> GenerationErrorCode {
    match err {
        ProviderError::AuthFailure(_) => GenerationErrorCode::ProviderAuthFailure,
        ProviderError::RateLimited { .. } => GenerationErrorCode::ProviderRateLimited,
        ProviderError::Timeout => GenerationErrorCode::ProviderTimeout,
        ProviderError::Unavailable(_) => GenerationErrorCode::ProviderUnavailable,
        // Output that cannot be used is a content error, not a transport one.
        ProviderError::InvalidResponse(_) => GenerationErrorCode::ParseFailure,
    }
}

// ---------------------------------------------------------------------------
// Stage tracking
// ---------------------------------------------------------------------------

struct StageTracker {
    stage: GenerationStage,
}

impl StageTracker {
    fn new() -> Self {
        Self {
            stage: GenerationStage::Requested,
        }
    }

    fn advance(&mut self, next: GenerationStage) {
        debug_assert!(
            self.stage.can_advance_to(next),
            "illegal stage transition {} -> {}",
            self.stage,
            next
        );
        tracing::debug!(from = %self.stage, stage = %next, "Generation stage");
        self.stage = next;
    }

    fn fail(
        &mut self,
        code: GenerationErrorCode,
        message: impl Into<String>,
        warnings: Vec<GenerationWarning>,
    ) -> GenerationError {
        let error = GenerationError {
            code,
            stage: self.stage,
            message: message.into(),
            warnings,
        };
        tracing::warn!(
            stage = %error.stage,
            code = %error.code,
            message = %error.message,
            "Generation failed"
        );
        self.stage = GenerationStage::Failed;
        error
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Runs one generation request end to end.
#[derive(Clone)]
pub struct GenerationOrchestrator {
    registry: Arc<ProviderRegistry>,
    store: Arc<dyn GenerationStore>,
    config: GenerationConfig,
}

impl GenerationOrchestrator {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        store: Arc<dyn GenerationStore>,
        config: GenerationConfig,
    ) -> Self {
        Self {
            registry,
            store,
            config,
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Generate and persist one set. On error nothing has been written.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationSummary, GenerationError> {
        let span = tracing::info_span!(
            "generation",
            creator_id = request.creator_id,
            provider = %request.provider,
            card_count = request.card_count,
        );
        self.run(request).instrument(span).await
    }

    /// Like [`generate`](Self::generate), but the run lives on its own task.
    ///
    /// Dropping the returned future (client disconnect, router timeout) does
    /// not cancel the run: it still completes and persists, or fails on its
    /// own provider timeout.
    pub async fn generate_detached(
        self: Arc<Self>,
        request: GenerationRequest,
    ) -> Result<GenerationSummary, GenerationError> {
        let handle = tokio::spawn(async move { self.generate(&request).await });
        match handle.await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(error = %e, "Generation task aborted");
                Err(GenerationError {
                    code: GenerationErrorCode::PersistenceFailure,
                    stage: GenerationStage::Failed,
                    message: format!("Generation task aborted: {e}"),
                    warnings: Vec::new(),
                })
            }
        }
    }

    async fn run(&self, request: &GenerationRequest) -> Result<GenerationSummary, GenerationError> {
        let mut tracker = StageTracker::new();

        // -- Requested: caller errors, before any provider call ---------------
        if let Err(e) = validate_generation_request(request) {
            return Err(tracker.fail(GenerationErrorCode::InvalidRequest, e.to_string(), Vec::new()));
        }

        let Some(provider) = self.registry.get(&request.provider) else {
            let available = self.registry.keys().join(", ");
            return Err(tracker.fail(
                GenerationErrorCode::InvalidRequest,
                format!(
                    "Provider '{}' is not available. Available providers: [{available}]",
                    request.provider
                ),
                Vec::new(),
            ));
        };

        let creator = match self.store.find_creator_profile(request.creator_id).await {
            Ok(Some(creator)) => creator,
            Ok(None) => {
                return Err(tracker.fail(
                    GenerationErrorCode::InvalidCreator,
                    format!("Creator {} not found", request.creator_id),
                    Vec::new(),
                ))
            }
            Err(e) => {
                return Err(tracker.fail(
                    GenerationErrorCode::PersistenceFailure,
                    format!("Failed to load creator: {e}"),
                    Vec::new(),
                ))
            }
        };

        // -- Prompting --------------------------------------------------------
        tracker.advance(GenerationStage::Prompting);
        let topic = request.topic.trim();
        let style = request.style_or_default();
        let language = non_blank(request.language.as_deref()).unwrap_or(DEFAULT_LANGUAGE);
        let prompt = build_prompt(&creator, topic, style, request.card_count, language);

        // -- Calling provider -------------------------------------------------
        tracker.advance(GenerationStage::CallingProvider);
        let response = match self.call_provider(provider.as_ref(), &prompt).await {
            Ok(response) => response,
            Err(e) => return Err(tracker.fail(provider_error_code(&e), e.to_string(), Vec::new())),
        };

        // -- Parsing ----------------------------------------------------------
        tracker.advance(GenerationStage::Parsing);
        let policy = ParsePolicy {
            requested: request.card_count as usize,
            min_survivor_fraction: self.config.min_survivor_fraction,
            similarity_threshold: self.config.similarity_threshold,
        };
        let batch = match parse_cards(&response.text, &policy) {
            Ok(batch) => batch,
            Err(e) => {
                let code = match e {
                    ParseError::NoCandidates { .. } => GenerationErrorCode::ParseFailure,
                    ParseError::InsufficientValidCards { .. } => {
                        GenerationErrorCode::InsufficientValidCards
                    }
                };
                let warnings = e.warnings().to_vec();
                return Err(tracker.fail(code, e.to_string(), warnings));
            }
        };
        for warning in &batch.warnings {
            tracing::warn!(
                kind = ?warning.kind,
                candidate = warning.candidate_index,
                "{}",
                warning.message
            );
        }

        // -- Assigning numbers ------------------------------------------------
        // Drafts are ordered here; sequence numbers are reserved inside the
        // persistence transaction so they cannot collide with other writers.
        tracker.advance(GenerationStage::AssigningNumbers);
        let context = DraftContext {
            topic: topic.to_string(),
            style: style.to_string(),
            provider: provider.key().to_string(),
            model: response.model.clone(),
            generated_at: chrono::Utc::now(),
        };
        let (cards, warnings) = batch.into_drafts(&context);
        let new_set = NewGeneratedSet {
            creator_id: request.creator_id,
            title: format!("Generated: {topic}"),
            description: format!("AI-generated content about: {topic}"),
            category: non_blank(request.category.as_deref())
                .unwrap_or(DEFAULT_CATEGORY)
                .to_string(),
            difficulty_level: DIFFICULTY_INTERMEDIATE.to_string(),
            content_style: style.to_string(),
            language: language.to_string(),
            tags: Vec::new(),
            cards,
        };

        // -- Persisting -------------------------------------------------------
        tracker.advance(GenerationStage::Persisting);
        let persisted = match self.store.persist_generated_set(&new_set).await {
            Ok(persisted) => persisted,
            Err(StoreError::Core(CoreError::NotFound {
                entity: "Creator", ..
            })) => {
                return Err(tracker.fail(
                    GenerationErrorCode::InvalidCreator,
                    format!(
                        "Creator {} was removed during generation; no content was saved",
                        request.creator_id
                    ),
                    warnings,
                ))
            }
            Err(e) => {
                return Err(tracker.fail(
                    GenerationErrorCode::PersistenceFailure,
                    format!("No content was saved: {e}"),
                    warnings,
                ))
            }
        };

        tracker.advance(GenerationStage::Completed);

        let pricing = provider.pricing();
        let summary = GenerationSummary {
            set_id: persisted.set.id,
            set_number: persisted.set.set_number.clone(),
            cards_requested: request.card_count,
            cards_generated: persisted.cards.len(),
            warnings,
            provider: provider.key().to_string(),
            model: response.model,
            usage: response.usage,
            estimated_cost_usd: response.usage.map(|u| pricing.estimate_cost(&u)),
        };
        tracing::info!(
            set_id = summary.set_id,
            set_number = %summary.set_number,
            cards_generated = summary.cards_generated,
            warnings = summary.warnings.len(),
            "Generation completed"
        );
        Ok(summary)
    }

    /// Call the provider with a per-call timeout, retrying transient
    /// failures once.
    async fn call_provider(
        &self,
        provider: &dyn ContentProvider,
        prompt: &Prompt,
    ) -> Result<ProviderResponse, ProviderError> {
        let mut attempt = 1;
        loop {
            tracing::debug!(attempt, model = provider.model(), "Calling provider");
            let result = tokio::time::timeout(
                self.config.provider_call_timeout,
                provider.generate(prompt, &self.config.model_params),
            )
            .await
            .unwrap_or(Err(ProviderError::Timeout));

            match result {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempt < MAX_PROVIDER_ATTEMPTS => {
                    let delay = self.backoff_for(&e);
                    tracing::warn!(
                        attempt,
                        error = %e,
                        delay_ms = delay.as_millis() as u64,
                        "Provider call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::warn!(attempt, kind = e.kind(), error = %e, "Provider call failed");
                    return Err(e);
                }
            }
        }
    }

    /// Vendor hint when given, otherwise the configured base delay; both
    /// capped at `max_backoff`.
    fn backoff_for(&self, err: &ProviderError) -> Duration {
        let delay = match err {
            ProviderError::RateLimited {
                retry_after: Some(hint),
            } => *hint,
            _ => self.config.retry_backoff,
        };
        delay.min(self.config.max_backoff)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
