use axum::routing::{get, post};
use axum::Router;

use crate::handlers::generation;
use crate::state::AppState;

/// Generation routes, merged directly into `/api/v1`.
///
/// ```text
/// POST   /generate     -> generate
/// GET    /providers    -> list_providers
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(generation::generate))
        .route("/providers", get(generation::list_providers))
}
