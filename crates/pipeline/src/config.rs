use std::time::Duration;

use boxiii_core::duplicate_detection::{validate_threshold, DEFAULT_SIMILARITY_THRESHOLD};
use boxiii_core::generation::DEFAULT_MIN_SURVIVOR_FRACTION;
use boxiii_llm::ModelParams;

/// Orchestrator tuning loaded from environment variables.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Share of requested cards that must survive validation.
    pub min_survivor_fraction: f64,
    /// `1.0` drops exact duplicates only; lower values also drop near
    /// duplicates by token overlap.
    pub similarity_threshold: f64,
    /// Upper bound on a single provider call.
    pub provider_call_timeout: Duration,
    /// Delay before the single retry when the provider gives no hint.
    pub retry_backoff: Duration,
    /// Cap on any retry delay, including vendor `retry-after` hints.
    pub max_backoff: Duration,
    /// Attempts at the batch write when a sequence number collides.
    pub persist_max_attempts: u32,
    pub model_params: ModelParams,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            min_survivor_fraction: DEFAULT_MIN_SURVIVOR_FRACTION,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            provider_call_timeout: Duration::from_secs(60),
            retry_backoff: Duration::from_millis(2000),
            max_backoff: Duration::from_secs(30),
            persist_max_attempts: 3,
            model_params: ModelParams::default(),
        }
    }
}

impl GenerationConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                             | Default |
    /// |-------------------------------------|---------|
    /// | `GENERATION_MIN_SURVIVOR_FRACTION`  | `0.5`   |
    /// | `GENERATION_SIMILARITY_THRESHOLD`   | `0.9`   |
    /// | `PROVIDER_CALL_TIMEOUT_SECS`        | `60`    |
    /// | `PROVIDER_RETRY_BACKOFF_MS`         | `2000`  |
    /// | `PROVIDER_MAX_BACKOFF_SECS`         | `30`    |
    /// | `PERSIST_MAX_ATTEMPTS`              | `3`     |
    /// | `PROVIDER_MAX_TOKENS`               | `4096`  |
    /// | `PROVIDER_TEMPERATURE`              | `0.7`   |
    pub fn from_env() -> Self {
        let min_survivor_fraction: f64 = std::env::var("GENERATION_MIN_SURVIVOR_FRACTION")
            .unwrap_or_else(|_| "0.5".into())
            .parse()
            .expect("GENERATION_MIN_SURVIVOR_FRACTION must be a number");
        assert!(
            (0.0..=1.0).contains(&min_survivor_fraction),
            "GENERATION_MIN_SURVIVOR_FRACTION must be between 0 and 1"
        );

        let similarity_threshold: f64 = std::env::var("GENERATION_SIMILARITY_THRESHOLD")
            .unwrap_or_else(|_| "0.9".into())
            .parse()
            .expect("GENERATION_SIMILARITY_THRESHOLD must be a number");
        validate_threshold(similarity_threshold)
            .expect("GENERATION_SIMILARITY_THRESHOLD out of range");

        let provider_call_timeout_secs: u64 = std::env::var("PROVIDER_CALL_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("PROVIDER_CALL_TIMEOUT_SECS must be a valid u64");

        let retry_backoff_ms: u64 = std::env::var("PROVIDER_RETRY_BACKOFF_MS")
            .unwrap_or_else(|_| "2000".into())
            .parse()
            .expect("PROVIDER_RETRY_BACKOFF_MS must be a valid u64");

        let max_backoff_secs: u64 = std::env::var("PROVIDER_MAX_BACKOFF_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("PROVIDER_MAX_BACKOFF_SECS must be a valid u64");

        let persist_max_attempts: u32 = std::env::var("PERSIST_MAX_ATTEMPTS")
            .unwrap_or_else(|_| "3".into())
            .parse()
            .expect("PERSIST_MAX_ATTEMPTS must be a valid u32");

        let max_tokens: u32 = std::env::var("PROVIDER_MAX_TOKENS")
            .unwrap_or_else(|_| "4096".into())
            .parse()
            .expect("PROVIDER_MAX_TOKENS must be a valid u32");

        let temperature: f32 = std::env::var("PROVIDER_TEMPERATURE")
            .unwrap_or_else(|_| "0.7".into())
            .parse()
            .expect("PROVIDER_TEMPERATURE must be a number");

        Self {
            min_survivor_fraction,
            similarity_threshold,
            provider_call_timeout: Duration::from_secs(provider_call_timeout_secs),
            retry_backoff: Duration::from_millis(retry_backoff_ms),
            max_backoff: Duration::from_secs(max_backoff_secs),
            persist_max_attempts: persist_max_attempts.max(1),
            model_params: ModelParams {
                max_tokens,
                temperature,
            },
        }
    }
}
