//! Handlers for the `/sets` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use boxiii_core::content::{
    normalize_tags, require_non_blank, validate_difficulty, validate_set_status,
};
use boxiii_core::error::CoreError;
use boxiii_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use boxiii_core::types::DbId;
use boxiii_db::models::content_set::{
    ContentSet, ContentSetFilter, CreateContentSet, UpdateContentSet,
};
use boxiii_db::repositories::ContentSetRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::query::CascadeParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /sets`.
#[derive(Debug, Deserialize)]
pub struct SetListParams {
    pub creator_id: Option<DbId>,
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

fn validate_attributes(
    difficulty_level: Option<&str>,
    status: Option<&str>,
    estimated_time_minutes: Option<i32>,
) -> Result<(), CoreError> {
    if let Some(level) = difficulty_level {
        validate_difficulty(level)?;
    }
    if let Some(status) = status {
        validate_set_status(status)?;
    }
    if estimated_time_minutes.is_some_and(|m| m < 0) {
        return Err(CoreError::Validation(
            "estimated_time_minutes cannot be negative".to_string(),
        ));
    }
    Ok(())
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "ContentSet",
        id,
    })
}

/// POST /api/v1/sets
///
/// The set number is assigned by the repository; callers cannot choose it.
pub async fn create(
    State(state): State<AppState>,
    Json(mut input): Json<CreateContentSet>,
) -> AppResult<(StatusCode, Json<ContentSet>)> {
    require_non_blank("title", &input.title)?;
    validate_attributes(
        input.difficulty_level.as_deref(),
        input.status.as_deref(),
        input.estimated_time_minutes,
    )?;
    input.tags = input.tags.take().map(normalize_tags);

    let set = ContentSetRepo::create(&state.pool, &input).await?;
    tracing::info!(set_id = set.id, set_number = %set.set_number, "Content set created");
    Ok((StatusCode::CREATED, Json(set)))
}

/// GET /api/v1/sets
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<SetListParams>,
) -> AppResult<Json<DataResponse<Vec<ContentSet>>>> {
    if let Some(status) = params.status.as_deref() {
        validate_set_status(status)?;
    }
    let filter = ContentSetFilter {
        creator_id: params.creator_id,
        status: params.status,
    };
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);
    let sets = ContentSetRepo::list(&state.pool, &filter, limit, offset).await?;
    Ok(Json(DataResponse { data: sets }))
}

/// GET /api/v1/sets/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ContentSet>> {
    let set = ContentSetRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(set))
}

/// PUT /api/v1/sets/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateContentSet>,
) -> AppResult<Json<ContentSet>> {
    if let Some(title) = input.title.as_deref() {
        require_non_blank("title", title)?;
    }
    validate_attributes(
        input.difficulty_level.as_deref(),
        input.status.as_deref(),
        input.estimated_time_minutes,
    )?;
    input.tags = input.tags.take().map(normalize_tags);

    let set = ContentSetRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(set))
}

/// DELETE /api/v1/sets/{id}
///
/// Refused with 409 while the set has cards unless `cascade=true`.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<CascadeParams>,
) -> AppResult<StatusCode> {
    if ContentSetRepo::delete(&state.pool, id, params.cascade).await? {
        tracing::info!(set_id = id, cascade = params.cascade, "Content set deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
