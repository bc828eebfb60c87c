use axum::{
    extract::{Query, State},
    Extension, Json,
};

use crate::database::models::{User, UserCreate};
use crate::handlers::PageParams;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::services::UserService;
use crate::state::AppState;

/// GET /api/v1/users (superuser)
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(page): Query<PageParams>,
) -> ApiResult<Vec<User>> {
    user.require_superuser()?;
    let page = page.resolve(&state)?;
    Ok(ApiResponse::success(UserService::new(state.pool.clone()).list(page).await?))
}

/// POST /api/v1/users (superuser)
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(input): Json<UserCreate>,
) -> ApiResult<User> {
    user.require_superuser()?;
    Ok(ApiResponse::created(UserService::new(state.pool.clone()).create(input).await?))
}

/// GET /api/v1/users/me
pub async fn me(Extension(user): Extension<CurrentUser>) -> ApiResult<User> {
    Ok(ApiResponse::success(user.0))
}
