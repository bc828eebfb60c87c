use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::database::models::{BusinessCategory, BusinessCreate, BusinessUpdate, BusinessWithOwner};
use crate::handlers::PageParams;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::services::businesses::{BusinessQuery, CategoryOption};
use crate::services::{BusinessService, Deleted};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BusinessListQuery {
    pub search: Option<String>,
    pub category: Option<BusinessCategory>,
    pub is_active: Option<bool>,
}

/// GET /api/v1/businesses
pub async fn list(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
    Query(query): Query<BusinessListQuery>,
) -> ApiResult<Vec<BusinessWithOwner>> {
    let page = page.resolve(&state)?;
    let filter = BusinessQuery {
        search: query.search.as_deref(),
        category: query.category,
        is_active: query.is_active,
    };
    Ok(ApiResponse::success(BusinessService::new(state.pool.clone()).list(filter, page).await?))
}

/// POST /api/v1/businesses
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(input): Json<BusinessCreate>,
) -> ApiResult<BusinessWithOwner> {
    let business = BusinessService::new(state.pool.clone()).create(input, user.id()).await?;
    Ok(ApiResponse::created(business))
}

/// GET /api/v1/businesses/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<BusinessWithOwner> {
    Ok(ApiResponse::success(BusinessService::new(state.pool.clone()).get(id).await?))
}

/// PUT /api/v1/businesses/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<BusinessUpdate>,
) -> ApiResult<BusinessWithOwner> {
    Ok(ApiResponse::success(BusinessService::new(state.pool.clone()).update(id, patch).await?))
}

/// DELETE /api/v1/businesses/:id (superuser)
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<Deleted> {
    user.require_superuser()?;
    Ok(ApiResponse::success(BusinessService::new(state.pool.clone()).delete(id).await?))
}

/// GET /api/v1/businesses/categories/list
pub async fn categories() -> ApiResult<Vec<CategoryOption>> {
    Ok(ApiResponse::success(BusinessService::categories()))
}
