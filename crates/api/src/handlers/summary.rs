use axum::extract::State;
use axum::Json;
use boxiii_core::schema::{system_schema, SystemSchema};
use boxiii_db::models::summary::DataSummary;
use boxiii_db::repositories::SummaryRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/summary
pub async fn get_summary(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DataSummary>>> {
    let summary = SummaryRepo::counts(&state.pool).await?;
    Ok(Json(DataResponse { data: summary }))
}

/// GET /api/v1/schema
pub async fn get_schema() -> Json<SystemSchema> {
    Json(system_schema(env!("CARGO_PKG_VERSION")))
}
