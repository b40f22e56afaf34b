//! The provider capability and its vendor-neutral request/response types.

use async_trait::async_trait;
use boxiii_core::prompt::Prompt;
use serde::Serialize;

use crate::error::ProviderError;

/// Sampling parameters for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            max_tokens: 4096,
            temperature: 0.7,
        }
    }
}

/// Token accounting reported by the vendor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// USD per million tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ModelPricing {
    pub input_per_million: f64,
    pub output_per_million: f64,
}

impl ModelPricing {
    pub fn estimate_cost(&self, usage: &TokenUsage) -> f64 {
        (f64::from(usage.input_tokens) * self.input_per_million
            + f64::from(usage.output_tokens) * self.output_per_million)
            / 1_000_000.0
    }
}

/// Raw output of a successful call.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub text: String,
    /// Model id the vendor reports having used.
    pub model: String,
    pub usage: Option<TokenUsage>,
}

/// One AI backend. Implementations hide the vendor's request shape and
/// authentication; the orchestrator selects them by [`key`](Self::key).
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Registry key used in generation requests.
    fn key(&self) -> &str;

    /// Model identifier sent to the vendor.
    fn model(&self) -> &str;

    fn pricing(&self) -> ModelPricing;

    async fn generate(
        &self,
        prompt: &Prompt,
        params: &ModelParams,
    ) -> Result<ProviderResponse, ProviderError>;
}
