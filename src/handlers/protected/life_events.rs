use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::database::models::{EventType, LifeEvent, LifeEventCreate, LifeEventUpdate};
use crate::handlers::PageParams;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::services::{Deleted, LifeEventService};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LifeEventListQuery {
    pub member_id: Option<i64>,
    pub event_type: Option<EventType>,
}

/// GET /api/v1/life-events
pub async fn list(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
    Query(query): Query<LifeEventListQuery>,
) -> ApiResult<Vec<LifeEvent>> {
    let page = page.resolve(&state)?;
    let events = LifeEventService::new(state.pool.clone())
        .list(query.member_id, query.event_type, page)
        .await?;
    Ok(ApiResponse::success(events))
}

/// POST /api/v1/life-events
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(input): Json<LifeEventCreate>,
) -> ApiResult<LifeEvent> {
    let event = LifeEventService::new(state.pool.clone()).create(input, user.id()).await?;
    Ok(ApiResponse::created(event))
}

/// GET /api/v1/life-events/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<LifeEvent> {
    Ok(ApiResponse::success(LifeEventService::new(state.pool.clone()).get(id).await?))
}

/// PUT /api/v1/life-events/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<LifeEventUpdate>,
) -> ApiResult<LifeEvent> {
    Ok(ApiResponse::success(LifeEventService::new(state.pool.clone()).update(id, patch).await?))
}

/// DELETE /api/v1/life-events/:id (superuser)
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<Deleted> {
    user.require_superuser()?;
    Ok(ApiResponse::success(LifeEventService::new(state.pool.clone()).delete(id).await?))
}
