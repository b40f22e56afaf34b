use axum::routing::get;
use axum::Router;

use crate::handlers::content_card;
use crate::state::AppState;

/// Routes mounted at `/cards`.
///
/// ```text
/// GET    /        -> list (?set_id=&creator_id=&limit=&offset=)
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(content_card::list))
        .route(
            "/{id}",
            get(content_card::get_by_id)
                .put(content_card::update)
                .delete(content_card::delete),
        )
}
