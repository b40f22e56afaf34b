pub mod content_card;
pub mod content_set;
pub mod creator;
pub mod generation;
pub mod health;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /generate                       run one generation request (POST)
/// /providers                      provider catalogue (GET)
/// /summary                        row counts (GET)
/// /schema                         content model descriptor (GET)
///
/// /creators                       list, create
/// /creators/{id}                  get, update, delete (?cascade=true)
///
/// /sets                           list (?creator_id=&status=), create
/// /sets/{id}                      get, update, delete (?cascade=true)
/// /sets/{id}/cards                list, add card
///
/// /cards                          list (?set_id=&creator_id=)
/// /cards/{id}                     get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(generation::router())
        .route("/summary", get(handlers::summary::get_summary))
        .route("/schema", get(handlers::summary::get_schema))
        .nest("/creators", creator::router())
        .nest("/sets", content_set::router())
        .nest("/cards", content_card::router())
}
