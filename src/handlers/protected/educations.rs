use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::database::models::{Education, EducationCreate, EducationUpdate};
use crate::handlers::PageParams;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::services::{Deleted, EducationService};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EducationListQuery {
    pub member_id: Option<i64>,
}

/// GET /api/v1/educations
pub async fn list(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
    Query(query): Query<EducationListQuery>,
) -> ApiResult<Vec<Education>> {
    let page = page.resolve(&state)?;
    Ok(ApiResponse::success(EducationService::new(state.pool.clone()).list(query.member_id, page).await?))
}

/// POST /api/v1/educations
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(input): Json<EducationCreate>,
) -> ApiResult<Education> {
    Ok(ApiResponse::created(EducationService::new(state.pool.clone()).create(input, user.id()).await?))
}

/// GET /api/v1/educations/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Education> {
    Ok(ApiResponse::success(EducationService::new(state.pool.clone()).get(id).await?))
}

/// PUT /api/v1/educations/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<EducationUpdate>,
) -> ApiResult<Education> {
    Ok(ApiResponse::success(EducationService::new(state.pool.clone()).update(id, patch).await?))
}

/// DELETE /api/v1/educations/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Deleted> {
    Ok(ApiResponse::success(EducationService::new(state.pool.clone()).delete(id).await?))
}

/// GET /api/v1/educations/member/:member_id
pub async fn for_member(State(state): State<AppState>, Path(member_id): Path<i64>) -> ApiResult<Vec<Education>> {
    Ok(ApiResponse::success(EducationService::new(state.pool.clone()).for_member(member_id).await?))
}
