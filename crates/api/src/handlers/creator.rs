//! Handlers for the `/creators` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use boxiii_core::content::{normalize_platforms, normalize_tags, require_non_blank, PlatformHandle};
use boxiii_core::error::CoreError;
use boxiii_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use boxiii_core::types::DbId;
use boxiii_db::models::creator::{CreateCreator, Creator, UpdateCreator};
use boxiii_db::repositories::CreatorRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::query::CascadeParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /creators`.
#[derive(Debug, Deserialize)]
pub struct CreatorListParams {
    /// Only creators that own at least one set (public viewer listing).
    #[serde(default)]
    pub with_sets_only: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Normalize the list-valued profile fields in place.
fn normalize_profile(
    platforms: &mut Option<Vec<PlatformHandle>>,
    categories: &mut Option<Vec<String>>,
    expertise_areas: &mut Option<Vec<String>>,
    follower_count: Option<i64>,
) -> Result<(), CoreError> {
    if let Some(list) = platforms.take() {
        *platforms = Some(normalize_platforms(&list)?);
    }
    if let Some(list) = categories.take() {
        *categories = Some(normalize_tags(list));
    }
    if let Some(list) = expertise_areas.take() {
        *expertise_areas = Some(normalize_tags(list));
    }
    if follower_count.is_some_and(|n| n < 0) {
        return Err(CoreError::Validation(
            "follower_count cannot be negative".to_string(),
        ));
    }
    Ok(())
}

/// POST /api/v1/creators
pub async fn create(
    State(state): State<AppState>,
    Json(mut input): Json<CreateCreator>,
) -> AppResult<(StatusCode, Json<Creator>)> {
    require_non_blank("display_name", &input.display_name)?;
    input.display_name = input.display_name.trim().to_string();
    normalize_profile(
        &mut input.platforms,
        &mut input.categories,
        &mut input.expertise_areas,
        input.follower_count,
    )?;

    let creator = CreatorRepo::create(&state.pool, &input).await?;
    tracing::info!(creator_id = creator.id, "Creator created");
    Ok((StatusCode::CREATED, Json(creator)))
}

/// GET /api/v1/creators
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<CreatorListParams>,
) -> AppResult<Json<DataResponse<Vec<Creator>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);
    let creators = CreatorRepo::list(&state.pool, params.with_sets_only, limit, offset).await?;
    Ok(Json(DataResponse { data: creators }))
}

/// GET /api/v1/creators/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Creator>> {
    let creator = CreatorRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Creator",
            id,
        }))?;
    Ok(Json(creator))
}

/// PUT /api/v1/creators/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateCreator>,
) -> AppResult<Json<Creator>> {
    if let Some(name) = input.display_name.take() {
        require_non_blank("display_name", &name)?;
        input.display_name = Some(name.trim().to_string());
    }
    normalize_profile(
        &mut input.platforms,
        &mut input.categories,
        &mut input.expertise_areas,
        input.follower_count,
    )?;

    let creator = CreatorRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Creator",
            id,
        }))?;
    Ok(Json(creator))
}

/// DELETE /api/v1/creators/{id}
///
/// Refused with 409 while the creator owns sets unless `cascade=true`.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<CascadeParams>,
) -> AppResult<StatusCode> {
    let deleted = CreatorRepo::delete(&state.pool, id, params.cascade).await?;
    if deleted {
        tracing::info!(creator_id = id, cascade = params.cascade, "Creator deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Creator",
            id,
        }))
    }
}
