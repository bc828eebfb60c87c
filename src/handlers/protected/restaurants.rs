use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::database::models::{RestaurantCreate, RestaurantMenu, RestaurantMenuCreate, RestaurantUpdate};
use crate::handlers::PageParams;
use crate::listing::{ListingQuery, RestaurantView};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{Deleted, RestaurantService};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RestaurantListQuery {
    pub search: Option<String>,
    #[serde(default)]
    pub halal_only: bool,
}

/// GET /api/v1/restaurants
///
/// Dedicated restaurants first, then restaurant-category businesses that
/// have no restaurant record. The window applies to the merged list.
pub async fn list(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
    Query(query): Query<RestaurantListQuery>,
) -> ApiResult<Vec<RestaurantView>> {
    let page = page.resolve(&state)?;
    let listing = ListingQuery::new(query.search.as_deref(), query.halal_only, page.skip, page.limit)?;
    Ok(ApiResponse::success(RestaurantService::new(state.pool.clone()).list(&listing).await?))
}

/// POST /api/v1/restaurants
pub async fn create(State(state): State<AppState>, Json(input): Json<RestaurantCreate>) -> ApiResult<RestaurantView> {
    Ok(ApiResponse::created(RestaurantService::new(state.pool.clone()).create(input).await?))
}

/// GET /api/v1/restaurants/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<RestaurantView> {
    Ok(ApiResponse::success(RestaurantService::new(state.pool.clone()).get(id).await?))
}

/// PUT /api/v1/restaurants/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<RestaurantUpdate>,
) -> ApiResult<RestaurantView> {
    Ok(ApiResponse::success(RestaurantService::new(state.pool.clone()).update(id, patch).await?))
}

/// DELETE /api/v1/restaurants/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Deleted> {
    Ok(ApiResponse::success(RestaurantService::new(state.pool.clone()).delete(id).await?))
}

/// POST /api/v1/restaurants/:id/menu
pub async fn add_menu(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<RestaurantMenuCreate>,
) -> ApiResult<RestaurantMenu> {
    Ok(ApiResponse::created(RestaurantService::new(state.pool.clone()).add_menu(id, input).await?))
}

/// DELETE /api/v1/restaurants/:id/menu/:menu_id
pub async fn delete_menu(
    State(state): State<AppState>,
    Path((id, menu_id)): Path<(i64, i64)>,
) -> ApiResult<Deleted> {
    Ok(ApiResponse::success(RestaurantService::new(state.pool.clone()).delete_menu(id, menu_id).await?))
}
