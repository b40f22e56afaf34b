//! Provider configuration loaded from environment variables.
//!
//! | Provider key | Variables (prefix) | Default model |
//! |--------------|--------------------|---------------|
//! | `gpt4`       | `OPENAI_`          | `gpt-4o` |
//! | `claude`     | `ANTHROPIC_`       | `claude-sonnet-4-20250514` |
//! | `gemini`     | `GEMINI_`          | `gemini-2.5-flash` |
//!
//! Each prefix reads `API_KEY` (required to register the provider),
//! `BASE_URL`, `MODEL`, `INPUT_PRICE_PER_MTOK`, and `OUTPUT_PRICE_PER_MTOK`.

use std::sync::Arc;

use crate::anthropic::{AnthropicProvider, DEFAULT_ANTHROPIC_BASE_URL};
use crate::openai::{OpenAiCompatibleProvider, DEFAULT_OPENAI_BASE_URL};
use crate::provider::ModelPricing;
use crate::registry::ProviderRegistry;

pub const GPT4_KEY: &str = "gpt4";
pub const CLAUDE_KEY: &str = "claude";
pub const GEMINI_KEY: &str = "gemini";

const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Connection settings for one provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub pricing: ModelPricing,
}

/// Settings for every provider family; `None` means not configured.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderConfig {
    pub openai: Option<ProviderSettings>,
    pub anthropic: Option<ProviderSettings>,
    pub gemini: Option<ProviderSettings>,
}

struct Defaults {
    prefix: &'static str,
    base_url: &'static str,
    model: &'static str,
    pricing: ModelPricing,
}

const OPENAI_DEFAULTS: Defaults = Defaults {
    prefix: "OPENAI",
    base_url: DEFAULT_OPENAI_BASE_URL,
    model: "gpt-4o",
    pricing: ModelPricing {
        input_per_million: 2.50,
        output_per_million: 10.00,
    },
};

const ANTHROPIC_DEFAULTS: Defaults = Defaults {
    prefix: "ANTHROPIC",
    base_url: DEFAULT_ANTHROPIC_BASE_URL,
    model: "claude-sonnet-4-20250514",
    pricing: ModelPricing {
        input_per_million: 3.00,
        output_per_million: 15.00,
    },
};

const GEMINI_DEFAULTS: Defaults = Defaults {
    prefix: "GEMINI",
    base_url: DEFAULT_GEMINI_BASE_URL,
    model: "gemini-2.5-flash",
    pricing: ModelPricing {
        input_per_million: 0.30,
        output_per_million: 2.50,
    },
};

fn settings_from<F>(lookup: &F, defaults: &Defaults) -> Option<ProviderSettings>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |suffix: &str| {
        lookup(&format!("{}_{suffix}", defaults.prefix))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };
    let price = |suffix: &str, default: f64| {
        var(suffix)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|p| p.is_finite() && *p >= 0.0)
            .unwrap_or(default)
    };

    let api_key = var("API_KEY")?;
    Some(ProviderSettings {
        api_key,
        base_url: var("BASE_URL").unwrap_or_else(|| defaults.base_url.to_string()),
        model: var("MODEL").unwrap_or_else(|| defaults.model.to_string()),
        pricing: ModelPricing {
            input_per_million: price("INPUT_PRICE_PER_MTOK", defaults.pricing.input_per_million),
            output_per_million: price("OUTPUT_PRICE_PER_MTOK", defaults.pricing.output_per_million),
        },
    })
}

impl ProviderConfig {
    /// Load from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            openai: settings_from(&lookup, &OPENAI_DEFAULTS),
            anthropic: settings_from(&lookup, &ANTHROPIC_DEFAULTS),
            gemini: settings_from(&lookup, &GEMINI_DEFAULTS),
        }
    }

    /// Build a registry containing every configured provider.
    pub fn build_registry(&self, client: reqwest::Client) -> ProviderRegistry {
        let mut registry = ProviderRegistry::new();
        if let Some(s) = &self.openai {
            registry.register(Arc::new(OpenAiCompatibleProvider::new(
                GPT4_KEY,
                client.clone(),
                &s.base_url,
                &s.api_key,
                &s.model,
                s.pricing,
            )));
        }
        if let Some(s) = &self.anthropic {
            registry.register(Arc::new(AnthropicProvider::new(
                CLAUDE_KEY,
                client.clone(),
                &s.base_url,
                &s.api_key,
                &s.model,
                s.pricing,
            )));
        }
        if let Some(s) = &self.gemini {
            registry.register(Arc::new(OpenAiCompatibleProvider::new(
                GEMINI_KEY,
                client,
                &s.base_url,
                &s.api_key,
                &s.model,
                s.pricing,
            )));
        }
        if registry.is_empty() {
            tracing::warn!("No AI provider API keys configured; generation requests will be rejected");
        } else {
            tracing::info!(providers = ?registry.keys(), "AI providers registered");
        }
        registry
    }
}
