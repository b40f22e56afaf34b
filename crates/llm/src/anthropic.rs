//! Adapter for the Anthropic Messages API.

use async_trait::async_trait;
use boxiii_core::prompt::Prompt;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::provider::{ContentProvider, ModelParams, ModelPricing, ProviderResponse, TokenUsage};

pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    key: String,
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    pricing: ModelPricing,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

impl AnthropicProvider {
    /// * `base_url` - API root without the `/v1` suffix.
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
impl ContentProvider for AnthropicProvider {
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
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            system: &prompt.system,
            messages: [Message {
                role: "user",
                content: &prompt.user,
            }],
        };

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
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
        let parsed: MessagesResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::InvalidResponse(format!("malformed message: {e}")))?;

        // Join text blocks; tool-use or thinking blocks are ignored.
        let text = parsed
            .content
            .iter()
            .filter(|block| block.block_type == "text")
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join("");
        if text.trim().is_empty() {
            return Err(ProviderError::InvalidResponse(
                "message has no text content".to_string(),
            ));
        }

        tracing::debug!(provider = %self.key, model = %self.model, chars = text.len(), "Message received");

        Ok(ProviderResponse {
            text,
            model: parsed.model.unwrap_or_else(|| self.model.clone()),
            usage: parsed.usage.map(|u| TokenUsage {
                input_tokens: u.input_tokens,
                output_tokens: u.output_tokens,
            }),
        })
    }
}
