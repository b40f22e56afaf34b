//! Handlers for content cards, both nested under `/sets/{id}/cards` and
//! addressed directly at `/cards/{id}`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use boxiii_core::content::{normalize_tags, require_non_blank, validate_media};
use boxiii_core::error::CoreError;
use boxiii_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use boxiii_core::types::DbId;
use boxiii_db::models::content_card::{
    ContentCard, ContentCardFilter, CreateContentCard, UpdateContentCard,
};
use boxiii_db::repositories::{ContentCardRepo, ContentSetRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /cards`.
#[derive(Debug, Deserialize)]
pub struct CardListParams {
    pub set_id: Option<DbId>,
    pub creator_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "ContentCard",
        id,
    })
}

fn validate_order_index(order_index: Option<i32>) -> Result<(), CoreError> {
    if order_index.is_some_and(|i| i < 0) {
        return Err(CoreError::Validation(
            "order_index cannot be negative".to_string(),
        ));
    }
    Ok(())
}

/// GET /api/v1/cards
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<CardListParams>,
) -> AppResult<Json<DataResponse<Vec<ContentCard>>>> {
    let filter = ContentCardFilter {
        set_id: params.set_id,
        creator_id: params.creator_id,
    };
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);
    let cards = ContentCardRepo::list(&state.pool, &filter, limit, offset).await?;
    Ok(Json(DataResponse { data: cards }))
}

/// GET /api/v1/sets/{id}/cards
pub async fn list_by_set(
    State(state): State<AppState>,
    Path(set_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ContentCard>>>> {
    if ContentSetRepo::find_by_id(&state.pool, set_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "ContentSet",
            id: set_id,
        }));
    }
    let cards = ContentCardRepo::list_by_set(&state.pool, set_id).await?;
    Ok(Json(DataResponse { data: cards }))
}

/// POST /api/v1/sets/{id}/cards
///
/// The card inherits the set's creator and receives the next card number
/// within the set.
pub async fn create(
    State(state): State<AppState>,
    Path(set_id): Path<DbId>,
    Json(mut input): Json<CreateContentCard>,
) -> AppResult<(StatusCode, Json<ContentCard>)> {
    require_non_blank("title", &input.title)?;
    require_non_blank("summary", &input.summary)?;
    validate_order_index(input.order_index)?;
    if let Some(media) = input.media.as_deref() {
        validate_media(media)?;
    }
    input.tags = input.tags.take().map(normalize_tags);

    let card = ContentCardRepo::create(&state.pool, set_id, &input).await?;
    tracing::info!(
        set_id,
        card_id = card.id,
        card_number = %card.card_number,
        "Content card created"
    );
    Ok((StatusCode::CREATED, Json(card)))
}

/// GET /api/v1/cards/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ContentCard>> {
    let card = ContentCardRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(card))
}

/// PUT /api/v1/cards/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateContentCard>,
) -> AppResult<Json<ContentCard>> {
    if let Some(title) = input.title.as_deref() {
        require_non_blank("title", title)?;
    }
    if let Some(summary) = input.summary.as_deref() {
        require_non_blank("summary", summary)?;
    }
    validate_order_index(input.order_index)?;
    if let Some(media) = input.media.as_deref() {
        validate_media(media)?;
    }
    input.tags = input.tags.take().map(normalize_tags);

    let card = ContentCardRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(card))
}

/// DELETE /api/v1/cards/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if ContentCardRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
