//! Provider adapters for AI text generation.
//!
//! - [`ContentProvider`] is the single capability every vendor adapter
//!   implements; callers only ever see [`ProviderResponse`] and
//!   [`ProviderError`].
//! - [`OpenAiCompatibleProvider`] covers OpenAI and any vendor exposing the
//!   chat-completions shape (Gemini's compatibility endpoint).
//! - [`AnthropicProvider`] speaks the Messages API.
//! - [`ProviderRegistry`] maps request keys (`"gpt4"`, `"claude"`,
//!   `"gemini"`) to adapters.

pub mod anthropic;
pub mod config;
pub mod error;
pub mod openai;
pub mod provider;
pub mod registry;

pub use anthropic::AnthropicProvider;
pub use config::{ProviderConfig, ProviderSettings};
pub use error::ProviderError;
pub use openai::OpenAiCompatibleProvider;
pub use provider::{ContentProvider, ModelParams, ModelPricing, ProviderResponse, TokenUsage};
pub use registry::{ProviderDescriptor, ProviderRegistry};
