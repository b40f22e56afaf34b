//! Route definitions for the `/sets` resource and its nested cards.

use axum::routing::get;
use axum::Router;

use crate::handlers::{content_card, content_set};
use crate::state::AppState;

/// Routes mounted at `/sets`.
///
/// ```text
/// GET    /              -> list (?creator_id=&status=&limit=&offset=)
/// POST   /              -> create
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete (?cascade=true)
/// GET    /{id}/cards    -> content_card::list_by_set
/// POST   /{id}/cards    -> content_card::create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(content_set::list).post(content_set::create))
        .route(
            "/{id}",
            get(content_set::get_by_id)
                .put(content_set::update)
                .delete(content_set::delete),
        )
        .route(
            "/{id}/cards",
            get(content_card::list_by_set).post(content_card::create),
        )
}
