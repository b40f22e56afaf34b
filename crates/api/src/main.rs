use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use boxiii_api::config::ServerConfig;
use boxiii_api::router::build_app_router;
use boxiii_api::state::AppState;
use boxiii_llm::ProviderConfig;
use boxiii_pipeline::{GenerationConfig, GenerationOrchestrator, PgGenerationStore};
use tokio::sync::Notify;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "boxiii_api=debug,boxiii_pipeline=debug,boxiii_llm=debug,boxiii_db=debug,tower_http=debug"
            .into()
    });
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let registry = tracing_subscriber::registry().with(filter);
    if json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env();
    let generation_config = GenerationConfig::from_env();
    let provider_config = ProviderConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = boxiii_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    boxiii_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    boxiii_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Providers ---
    // The orchestrator enforces its own per-call timeout; the client
    // timeout only guards against a stuck connection outliving it.
    let http_client = reqwest::Client::builder()
        .timeout(generation_config.provider_call_timeout + Duration::from_secs(5))
        .build()
        .expect("Failed to build HTTP client");
    let registry = provider_config.build_registry(http_client);
    if registry.is_empty() {
        tracing::warn!("No AI provider API keys configured; generation requests will be rejected");
    } else {
        tracing::info!(providers = ?registry.keys(), "AI providers registered");
    }

    // --- Generation pipeline ---
    let store = PgGenerationStore::new(pool.clone(), generation_config.persist_max_attempts);
    let orchestrator = GenerationOrchestrator::new(
        Arc::new(registry),
        Arc::new(store),
        generation_config,
    );

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        orchestrator: Arc::new(orchestrator),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    let draining = Arc::new(Notify::new());
    let draining_signal = Arc::clone(&draining);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        draining_signal.notify_one();
    });

    let drain_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    tokio::select! {
        result = server.into_future() => result.expect("Server error"),
        () = async {
            draining.notified().await;
            tokio::time::sleep(drain_timeout).await;
        } => {
            tracing::warn!(
                timeout_secs = config.shutdown_timeout_secs,
                "In-flight requests did not finish before the shutdown timeout"
            );
        }
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
