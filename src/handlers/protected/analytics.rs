use axum::extract::State;

use crate::analytics::{AnalyticsEngine, DashboardSummary, MemberStatistics, PgAnalyticsStore};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/v1/analytics/dashboard
pub async fn dashboard(State(state): State<AppState>) -> ApiResult<DashboardSummary> {
    let store = PgAnalyticsStore::new(state.pool.clone());
    let summary = AnalyticsEngine::new(&store, state.clock.as_ref()).dashboard().await?;
    Ok(ApiResponse::success(summary))
}

/// GET /api/v1/analytics/members/statistics
pub async fn member_statistics(State(state): State<AppState>) -> ApiResult<MemberStatistics> {
    let store = PgAnalyticsStore::new(state.pool.clone());
    let stats = AnalyticsEngine::new(&store, state.clock.as_ref()).member_statistics().await?;
    Ok(ApiResponse::success(stats))
}
