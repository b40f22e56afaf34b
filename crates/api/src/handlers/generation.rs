//! Handlers for content generation and the provider catalogue.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use boxiii_core::card_parser::GenerationWarning;
use boxiii_core::generation::{GenerationErrorCode, GenerationRequest, GenerationStage};
use boxiii_core::types::DbId;
use boxiii_llm::ProviderDescriptor;
use boxiii_pipeline::{GenerationError, GenerationSummary};
use serde::Serialize;

use crate::response::DataResponse;
use crate::state::AppState;

/// Body of every `POST /generate` answer, successful or not.
#[derive(Debug, Serialize)]
pub struct GenerationResponse {
    pub success: bool,
    pub set_id: Option<DbId>,
    pub set_number: Option<String>,
    pub cards_generated: usize,
    pub warnings: Vec<GenerationWarning>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub estimated_cost_usd: Option<f64>,
    pub message: String,
    /// Set only when `success` is false.
    pub error: Option<GenerationErrorCode>,
    /// Stage at which a failed run stopped.
    pub failed_stage: Option<GenerationStage>,
}

impl From<GenerationSummary> for GenerationResponse {
    fn from(summary: GenerationSummary) -> Self {
        let message = if summary.cards_generated < summary.cards_requested as usize {
            format!(
                "Generated {} of {} requested content cards in set {}",
                summary.cards_generated, summary.cards_requested, summary.set_number
            )
        } else {
            format!(
                "Successfully generated {} content cards in set {}",
                summary.cards_generated, summary.set_number
            )
        };
        Self {
            success: true,
            set_id: Some(summary.set_id),
            set_number: Some(summary.set_number),
            cards_generated: summary.cards_generated,
            warnings: summary.warnings,
            provider: Some(summary.provider),
            model: Some(summary.model),
            estimated_cost_usd: summary.estimated_cost_usd,
            message,
            error: None,
            failed_stage: None,
        }
    }
}

impl From<GenerationError> for GenerationResponse {
    fn from(err: GenerationError) -> Self {
        Self {
            success: false,
            set_id: None,
            set_number: None,
            cards_generated: 0,
            warnings: err.warnings,
            provider: None,
            model: None,
            estimated_cost_usd: None,
            message: err.message,
            error: Some(err.code),
            failed_stage: Some(err.stage),
        }
    }
}

/// POST /api/v1/generate
///
/// The run is detached from the request, so a caller that hangs up does not
/// cancel it. Always answers 200 once the body deserializes; failures are
/// reported through `success` and `error`.
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerationRequest>,
) -> Json<GenerationResponse> {
    let orchestrator = Arc::clone(&state.orchestrator);
    let response = match orchestrator.generate_detached(request).await {
        Ok(summary) => GenerationResponse::from(summary),
        Err(err) => GenerationResponse::from(err),
    };
    Json(response)
}

/// GET /api/v1/providers
pub async fn list_providers(
    State(state): State<AppState>,
) -> Json<DataResponse<Vec<ProviderDescriptor>>> {
    Json(DataResponse {
        data: state.orchestrator.registry().descriptors(),
    })
}
