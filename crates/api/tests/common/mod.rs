#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use boxiii_api::config::ServerConfig;
use boxiii_api::router::build_app_router;
use boxiii_api::state::AppState;
use boxiii_core::prompt::Prompt;
use boxiii_llm::{
    ContentProvider, ModelParams, ModelPricing, ProviderError, ProviderRegistry, ProviderResponse,
    TokenUsage,
};
use boxiii_pipeline::{GenerationConfig, GenerationOrchestrator, PgGenerationStore};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
    }
}

// ---------------------------------------------------------------------------
// Canned provider
// ---------------------------------------------------------------------------

/// Provider that answers every call with the same outcome.
pub struct CannedProvider {
    key: &'static str,
    outcome: Result<String, ProviderError>,
    delay: Duration,
}

impl CannedProvider {
    /// Returns `count` distinct, well-formed cards.
    pub fn cards(key: &'static str, count: usize) -> Self {
        let cards: Vec<_> = (1..=count)
            .map(|i| {
                serde_json::json!({
                    "title": format!("Aspect {i}"),
                    "summary": format!("Distinct explanation number {i} of the topic."),
                    "detailed_content": format!("Longer text for aspect {i}."),
                    "tags": ["biology"],
                    "difficulty": "beginner",
                })
            })
            .collect();
        Self {
            key,
            outcome: Ok(serde_json::json!({ "cards": cards }).to_string()),
            delay: Duration::ZERO,
        }
    }

    pub fn failing(key: &'static str, error: ProviderError) -> Self {
        Self {
            key,
            outcome: Err(error),
            delay: Duration::ZERO,
        }
    }

    /// Wait `delay` before answering.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl ContentProvider for CannedProvider {
    fn key(&self) -> &str {
        self.key
    }

    fn model(&self) -> &str {
        "canned-model"
    }

    fn pricing(&self) -> ModelPricing {
        ModelPricing {
            input_per_million: 3.0,
            output_per_million: 15.0,
        }
    }

    async fn generate(
        &self,
        _prompt: &Prompt,
        _params: &ModelParams,
    ) -> Result<ProviderResponse, ProviderError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let text = self.outcome.clone()?;
        Ok(ProviderResponse {
            text,
            model: "canned-model".to_string(),
            usage: Some(TokenUsage {
                input_tokens: 1_000,
                output_tokens: 2_000,
            }),
        })
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build the full application router with a `claude` provider that returns
/// five distinct cards.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, vec![CannedProvider::cards("claude", 5)])
}

/// Build the full application router with the given providers registered.
pub fn build_test_app_with(pool: PgPool, providers: Vec<CannedProvider>) -> Router {
    let config = test_config();

    let mut registry = ProviderRegistry::new();
    for provider in providers {
        registry.register(Arc::new(provider));
    }
    let generation_config = GenerationConfig {
        provider_call_timeout: Duration::from_secs(5),
        retry_backoff: Duration::from_millis(10),
        max_backoff: Duration::from_millis(50),
        ..Default::default()
    };
    let store = PgGenerationStore::new(pool.clone(), generation_config.persist_max_attempts);
    let orchestrator =
        GenerationOrchestrator::new(Arc::new(registry), Arc::new(store), generation_config);

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        orchestrator: Arc::new(orchestrator),
    };

    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, "POST", uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, "PUT", uri, body).await
}

async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a creator through the API and return its id.
pub async fn create_creator(pool: &PgPool, display_name: &str) -> i64 {
    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/creators",
        serde_json::json!({ "display_name": display_name }),
    )
    .await;
    body_json(response).await["id"].as_i64().unwrap()
}

/// Create a set through the API and return its id.
pub async fn create_set(pool: &PgPool, creator_id: i64, title: &str) -> i64 {
    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/sets",
        serde_json::json!({ "creator_id": creator_id, "title": title }),
    )
    .await;
    body_json(response).await["id"].as_i64().unwrap()
}
