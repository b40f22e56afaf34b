//! Route definitions for the `/creators` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::creator;
use crate::state::AppState;

/// Routes mounted at `/creators`.
///
/// ```text
/// GET    /        -> list (?with_sets_only=&limit=&offset=)
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete (?cascade=true)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(creator::list).post(creator::create))
        .route(
            "/{id}",
            get(creator::get_by_id)
                .put(creator::update)
                .delete(creator::delete),
        )
}
