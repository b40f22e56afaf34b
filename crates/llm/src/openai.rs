//! Adapter for the OpenAI chat-completions API and compatible endpoints.

use async_trait::async_trait;
use boxiii_core::prompt::Prompt;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::provider::{ContentProvider, ModelParams, ModelPricing, ProviderResponse, TokenUsage};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat-completions adapter. Used for OpenAI and, through Google's
/// OpenAI-compatible endpoint, for Gemini.
pub struct OpenAiCompatibleProvider {
    key: String,
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    pricing: ModelPricing,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

impl OpenAiCompatibleProvider {
    /// * `key` - registry key, e.g. `gpt4`.
    /// * `base_url` - API root without trailing slash, e.g. `https://api.openai.com/v1`.
    pub fn new(
        key: impl Into<String>,
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        pricing: ModelPricing,
    ) -> Self {
        Self {
            key: key.into(),
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            pricing,
        }
    }
}

#[async_trait]
impl ContentProvider for OpenAiCompatibleProvider {
    fn key(&self) -> &str {
        &self.key
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn pricing(&self) -> ModelPricing {
        self.pricing
    }

    async fn generate(
        &self,
        prompt: &Prompt,
        params: &ModelParams,
    ) -> Result<ProviderResponse, ProviderError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(status, &headers, &body));
        }

        let body = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::InvalidResponse(format!("malformed completion: {e}")))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| ProviderError::InvalidResponse("completion has no content".to_string()))?;

        tracing::debug!(provider = %self.key, model = %self.model, chars = text.len(), "Chat completion received");

        Ok(ProviderResponse {
            text,
            model: parsed.model.unwrap_or_else(|| self.model.clone()),
            usage: parsed.usage.map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            }),
        })
    }
}
