use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::database::models::{Member, MemberCreate, MemberUpdate, MemberWithRelations};
use crate::handlers::PageParams;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::services::{Deleted, MemberService};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MemberListQuery {
    pub search: Option<String>,
}

/// GET /api/v1/members
pub async fn list(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
    Query(query): Query<MemberListQuery>,
) -> ApiResult<Vec<Member>> {
    let page = page.resolve(&state)?;
    let members = MemberService::new(state.pool.clone()).list(query.search.as_deref(), page).await?;
    Ok(ApiResponse::success(members))
}

/// POST /api/v1/members
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(input): Json<MemberCreate>,
) -> ApiResult<Member> {
    let member = MemberService::new(state.pool.clone()).create(input, user.id()).await?;
    Ok(ApiResponse::created(member))
}

/// GET /api/v1/members/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<MemberWithRelations> {
    Ok(ApiResponse::success(MemberService::new(state.pool.clone()).get(id).await?))
}

/// PUT /api/v1/members/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<MemberUpdate>,
) -> ApiResult<Member> {
    Ok(ApiResponse::success(MemberService::new(state.pool.clone()).update(id, patch).await?))
}

/// DELETE /api/v1/members/:id (superuser)
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<Deleted> {
    user.require_superuser()?;
    Ok(ApiResponse::success(MemberService::new(state.pool.clone()).delete(id).await?))
}
