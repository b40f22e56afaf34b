use std::sync::Arc;

use boxiii_pipeline::GenerationOrchestrator;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything inside is an `Arc` or a pool handle.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: boxiii_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Generation pipeline; also owns the provider registry.
    pub orchestrator: Arc<GenerationOrchestrator>,
}
