use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::database::models::{MasjidCreate, MasjidType, MasjidUpdate, MasjidWithRelations, Member};
use crate::handlers::PageParams;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::services::{Deleted, MasjidService};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MasjidListQuery {
    pub search: Option<String>,
    pub masjid_type: Option<MasjidType>,
}

/// GET /api/v1/masjids
pub async fn list(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
    Query(query): Query<MasjidListQuery>,
) -> ApiResult<Vec<MasjidWithRelations>> {
    let page = page.resolve(&state)?;
    let masjids = MasjidService::new(state.pool.clone())
        .list(query.search.as_deref(), query.masjid_type, page)
        .await?;
    Ok(ApiResponse::success(masjids))
}

/// POST /api/v1/masjids
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(input): Json<MasjidCreate>,
) -> ApiResult<MasjidWithRelations> {
    Ok(ApiResponse::created(MasjidService::new(state.pool.clone()).create(input, user.id()).await?))
}

/// GET /api/v1/masjids/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<MasjidWithRelations> {
    Ok(ApiResponse::success(MasjidService::new(state.pool.clone()).get(id).await?))
}

/// PUT /api/v1/masjids/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<MasjidUpdate>,
) -> ApiResult<MasjidWithRelations> {
    Ok(ApiResponse::success(MasjidService::new(state.pool.clone()).update(id, patch).await?))
}

/// DELETE /api/v1/masjids/:id (superuser)
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<Deleted> {
    user.require_superuser()?;
    Ok(ApiResponse::success(MasjidService::new(state.pool.clone()).delete(id).await?))
}

/// GET /api/v1/masjids/:id/members
pub async fn members(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Vec<Member>> {
    Ok(ApiResponse::success(MasjidService::new(state.pool.clone()).members(id).await?))
}
